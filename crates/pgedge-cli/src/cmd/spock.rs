use std::fmt;

use anyhow::{Context, Result};
use pgedge_core::spock::ReplicationSets;
use serde::Serialize;

use crate::output;

#[derive(Debug, Serialize)]
pub struct SetOut {
    pub set: String,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl fmt::Display for SetOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.status, self.action) {
            (Some(status), _) => write!(f, "Replication set status: {status}"),
            (None, "create") => f.write_str("Replication set created successfully."),
            (None, _) => f.write_str("Replication set dropped successfully."),
        }
    }
}

pub fn create_set(backend: &dyn ReplicationSets, set: &str) -> Result<()> {
    backend
        .create_set(set)
        .context("failed to create replication set")?;
    output::print_success(&SetOut { set: set.to_string(), action: "create", status: None })
}

pub fn drop_set(backend: &dyn ReplicationSets, set: &str) -> Result<()> {
    backend
        .drop_set(set)
        .context("failed to drop replication set")?;
    output::print_success(&SetOut { set: set.to_string(), action: "drop", status: None })
}

pub fn check_set(backend: &dyn ReplicationSets, set: &str) -> Result<()> {
    let status = backend
        .check_set(set)
        .context("failed to check replication set")?;
    output::print(&SetOut { set: set.to_string(), action: "check", status: Some(status) })
}
