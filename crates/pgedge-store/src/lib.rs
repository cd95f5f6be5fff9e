//! pgedge-store
//!
//! Local persistence for cluster topology documents.
//!
//! Layout under the operator home:
//!
//! ```text
//! <home>/cluster/<cluster>/<cluster>.json
//! ```
//!
//! Writes create the cluster directory if needed, stamp `update_date`, and
//! overwrite the whole file. There is no locking: the CLI is operator-driven
//! and a failed write is fixed by re-running the command.

mod paths;

use std::fs;
use std::io;
use std::path::PathBuf;

use pgedge_core::config::ClusterEnv;
use pgedge_core::model::TopologyDocument;
use pgedge_core::{PgEdgeError, PgEdgeResult};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info};

pub use paths::{ClusterPaths, CLUSTER_DIR};

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the `cluster/` tree.
    pub root: PathBuf,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the operator's home directory.
    pub fn for_env(env: &ClusterEnv) -> Self {
        Self::new(env.home())
    }
}

/// Handle to the cluster file tree.
#[derive(Debug, Clone)]
pub struct ClusterStore {
    cfg: StoreConfig,
}

impl ClusterStore {
    pub fn open(cfg: StoreConfig) -> Self {
        Self { cfg }
    }

    /// Resolve the directory and file of `cluster_name` without touching
    /// the filesystem.
    pub fn locate(&self, cluster_name: &str) -> PgEdgeResult<ClusterPaths> {
        ClusterPaths::resolve(&self.cfg.root, cluster_name)
    }

    pub fn exists(&self, cluster_name: &str) -> PgEdgeResult<bool> {
        Ok(self.locate(cluster_name)?.file.is_file())
    }

    /// Stamp `doc.updated_at` and write it as indented JSON, replacing any
    /// previous file. Returns the path written.
    pub fn save(&self, cluster_name: &str, doc: &mut TopologyDocument) -> PgEdgeResult<PathBuf> {
        let paths = self.locate(cluster_name)?;

        fs::create_dir_all(&paths.dir).map_err(|source| PgEdgeError::DirectoryCreate {
            path: paths.dir.clone(),
            source,
        })?;
        debug!(dir = %paths.dir.display(), "cluster directory ready");

        doc.updated_at = now_rfc3339()?;
        let bytes = serde_json::to_vec_pretty(doc)?;

        fs::write(&paths.file, &bytes).map_err(|source| PgEdgeError::Write {
            path: paths.file.clone(),
            source,
        })?;
        info!(
            cluster = cluster_name,
            file = %paths.file.display(),
            bytes = bytes.len(),
            "cluster json written"
        );
        Ok(paths.file)
    }

    /// Read and parse the document of `cluster_name`.
    pub fn load(&self, cluster_name: &str) -> PgEdgeResult<TopologyDocument> {
        let paths = self.locate(cluster_name)?;

        let raw = match fs::read(&paths.file) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PgEdgeError::FileNotFound { path: paths.file });
            }
            Err(source) => {
                return Err(PgEdgeError::Read {
                    path: paths.file,
                    source,
                });
            }
        };

        let doc = serde_json::from_slice(&raw).map_err(|source| PgEdgeError::Parse {
            path: paths.file.clone(),
            source,
        })?;
        debug!(cluster = cluster_name, file = %paths.file.display(), "cluster json loaded");
        Ok(doc)
    }
}

fn now_rfc3339() -> PgEdgeResult<String> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}
