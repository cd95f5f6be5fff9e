//! Node membership operations.
//!
//! Membership changes are not wired to a running cluster yet.
//! [`PlaceholderBackend`] checks its input and reports success so the command
//! surface can be exercised end to end; a real backend implements
//! [`NodeMembership`] against the cluster.

use crate::errors::{PgEdgeError, PgEdgeResult};

pub trait NodeMembership {
    fn add_node(&self, node: &str) -> PgEdgeResult<()>;
    fn remove_node(&self, node: &str) -> PgEdgeResult<()>;
    fn list_nodes(&self) -> PgEdgeResult<Vec<String>>;
}

/// Backend that accepts any non-empty identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderBackend;

const PLACEHOLDER_NODES: [&str; 3] = ["node1", "node2", "node3"];

/// Reject empty identifiers. Anything else, whitespace included, is passed
/// through unchanged.
pub(crate) fn require_identifier(value: &str, what: &str) -> PgEdgeResult<()> {
    if value.is_empty() {
        return Err(PgEdgeError::invalid_input(format!("{what} cannot be empty")));
    }
    Ok(())
}

impl NodeMembership for PlaceholderBackend {
    fn add_node(&self, node: &str) -> PgEdgeResult<()> {
        require_identifier(node, "node name")
    }

    fn remove_node(&self, node: &str) -> PgEdgeResult<()> {
        require_identifier(node, "node name")
    }

    fn list_nodes(&self) -> PgEdgeResult<Vec<String>> {
        Ok(PLACEHOLDER_NODES.iter().map(|s| s.to_string()).collect())
    }
}
