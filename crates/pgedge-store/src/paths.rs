use std::path::{Path, PathBuf};

use pgedge_core::{PgEdgeError, PgEdgeResult};

/// Directory under the store root that holds one sub-directory per cluster.
pub const CLUSTER_DIR: &str = "cluster";

/// Directory and file of one cluster document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterPaths {
    pub dir: PathBuf,
    pub file: PathBuf,
}

impl ClusterPaths {
    /// `<root>/cluster/<name>/` and `<root>/cluster/<name>/<name>.json`.
    pub fn resolve(root: &Path, cluster_name: &str) -> PgEdgeResult<Self> {
        check_name(cluster_name)?;
        let dir = root.join(CLUSTER_DIR).join(cluster_name);
        let file = dir.join(format!("{cluster_name}.json"));
        Ok(Self { dir, file })
    }
}

/// Cluster names become a single path component.
fn check_name(name: &str) -> PgEdgeResult<()> {
    if name.is_empty() {
        return Err(PgEdgeError::invalid_input("cluster name cannot be empty"));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(PgEdgeError::invalid_input(format!(
            "cluster name must be a single path component: {name}"
        )));
    }
    Ok(())
}
