//! Configuration structures for pgedge-core.
//!
//! The core crate itself does not read environment variables. The operator's
//! home directory and identity must be provided explicitly by the caller so
//! that builders and the store behave identically under test.

use std::path::{Path, PathBuf};

use crate::errors::{PgEdgeError, PgEdgeResult};

/// Operator environment threaded through builders and persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterEnv {
    /// Root under which cluster files and default node paths are placed.
    pub home: PathBuf,
    /// Operator identity; used for broker client ids and log context.
    pub operator: String,
}

impl ClusterEnv {
    pub fn new(home: impl Into<PathBuf>, operator: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            operator: operator.into(),
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Default data directory of a primary node: `<home>/<cluster>/<node>`.
    pub fn primary_path(&self, cluster_name: &str, node_name: &str) -> String {
        self.home
            .join(cluster_name)
            .join(node_name)
            .to_string_lossy()
            .into_owned()
    }

    /// Default data directory of a replica node: `<home>/<parent>/<replica>`.
    pub fn replica_path(&self, parent_name: &str, replica_name: &str) -> String {
        self.home
            .join(parent_name)
            .join(replica_name)
            .to_string_lossy()
            .into_owned()
    }
}

/// Validate an environment before use.
pub fn validate_env(env: &ClusterEnv) -> PgEdgeResult<()> {
    if env.home.as_os_str().is_empty() {
        return Err(PgEdgeError::invalid_input("home directory must not be empty"));
    }
    if env.operator.trim().is_empty() {
        return Err(PgEdgeError::invalid_input("operator must not be empty"));
    }
    Ok(())
}
