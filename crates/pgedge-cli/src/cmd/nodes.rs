use std::fmt;

use anyhow::{Context, Result};
use pgedge_core::cluster::NodeMembership;
use serde::Serialize;

use crate::output;

#[derive(Debug, Serialize)]
pub struct NodeOut {
    pub action: &'static str,
    pub node: String,
    pub ok: bool,
}

impl fmt::Display for NodeOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            "add" => f.write_str("Node added successfully."),
            _ => f.write_str("Node removed successfully."),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NodesOut {
    pub nodes: Vec<String>,
}

impl fmt::Display for NodesOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nodes in the cluster:")?;
        for n in &self.nodes {
            write!(f, "\n{n}")?;
        }
        Ok(())
    }
}

pub fn add(backend: &dyn NodeMembership, node: &str) -> Result<()> {
    backend.add_node(node).context("failed to add node")?;
    output::print_success(&NodeOut { action: "add", node: node.to_string(), ok: true })
}

pub fn remove(backend: &dyn NodeMembership, node: &str) -> Result<()> {
    backend.remove_node(node).context("failed to remove node")?;
    output::print_success(&NodeOut { action: "remove", node: node.to_string(), ok: true })
}

pub fn list(backend: &dyn NodeMembership) -> Result<()> {
    let nodes = backend.list_nodes().context("failed to list nodes")?;
    output::print(&NodesOut { nodes })
}
