use std::fmt;

use anyhow::Result;
use serde::Serialize;

use crate::output;

#[derive(Debug, Serialize)]
pub struct VersionOut {
    pub name: &'static str,
    pub version: &'static str,
}

impl fmt::Display for VersionOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} version {}", self.name, self.version)
    }
}

pub fn run() -> Result<()> {
    output::print(&VersionOut {
        name: "pgedgecli",
        version: env!("CARGO_PKG_VERSION"),
    })
}
