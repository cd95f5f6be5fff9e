use std::fmt;
use std::io::{self, Write};

use anyhow::{Context, Result};
use pgedge_core::builder::{build_interactive, build_template, ClusterRequest};
use pgedge_core::config::ClusterEnv;
use pgedge_core::model::{DatabaseCredential, TopologyDocument};
use pgedge_core::validate::{lint_document, validate_document};
use pgedge_store::{ClusterStore, StoreConfig};
use serde::Serialize;
use tracing::warn;

use crate::io::prompt::TerminalPrompter;
use crate::output;

pub struct Request {
    pub cluster_name: String,
    pub num_nodes: usize,
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
}

pub enum Mode {
    Interactive,
    Template { pg_version: String, port: u16 },
}

#[derive(Debug, Serialize)]
pub struct NodeSummary {
    pub name: String,
    pub port: String,
    pub sub_nodes: usize,
}

#[derive(Debug, Serialize)]
pub struct CreateJsonOut {
    pub cluster: String,
    pub file: String,
    pub pg_version: String,
    pub nodes: Vec<NodeSummary>,
    pub warnings: Vec<String>,
}

impl fmt::Display for CreateJsonOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\nCluster JSON file created successfully at: {}", self.file)
    }
}

pub fn run(env: &ClusterEnv, req: Request, mode: Mode) -> Result<()> {
    let request = ClusterRequest::new(
        req.cluster_name,
        req.num_nodes,
        DatabaseCredential::new(req.db_name, req.db_user, req.db_password),
    );

    let mut doc = match mode {
        Mode::Template { pg_version, port } => build_template(env, &request, &pg_version, port)?,
        Mode::Interactive => {
            // Keep stdout clean for the JSON result.
            let out: Box<dyn Write> = if output::is_json() {
                Box::new(io::stderr())
            } else {
                Box::new(io::stdout())
            };
            let mut prompter = TerminalPrompter::new(io::stdin().lock(), out);
            build_interactive(env, &request, &mut prompter)?
        }
    };

    validate_document(&doc).context("validation error")?;
    let warnings: Vec<String> = lint_document(&doc).iter().map(|f| f.to_string()).collect();
    for w in &warnings {
        warn!(cluster = %doc.cluster_name, "{w}");
    }

    let store = ClusterStore::open(StoreConfig::for_env(env));
    if store.exists(&request.cluster_name)? {
        warn!(cluster = %request.cluster_name, "replacing existing cluster JSON file");
    }
    let file = store
        .save(&request.cluster_name, &mut doc)
        .context("failed to write JSON file")?;

    output::print_success(&summarize(&doc, file.display().to_string(), warnings))?;
    Ok(())
}

fn summarize(doc: &TopologyDocument, file: String, warnings: Vec<String>) -> CreateJsonOut {
    CreateJsonOut {
        cluster: doc.cluster_name.clone(),
        file,
        pg_version: doc.database.engine_version.clone(),
        nodes: doc
            .node_groups
            .iter()
            .map(|n| NodeSummary {
                name: n.endpoint.name.clone(),
                port: n.endpoint.port.to_string(),
                sub_nodes: n.sub_nodes.len(),
            })
            .collect(),
        warnings,
    }
}
