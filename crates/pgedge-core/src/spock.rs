//! Spock replication-set operations.

use crate::cluster::{require_identifier, PlaceholderBackend};
use crate::errors::PgEdgeResult;

pub trait ReplicationSets {
    fn create_set(&self, set: &str) -> PgEdgeResult<()>;
    fn drop_set(&self, set: &str) -> PgEdgeResult<()>;
    /// Current status of the set, e.g. `"active"`.
    fn check_set(&self, set: &str) -> PgEdgeResult<String>;
}

impl ReplicationSets for PlaceholderBackend {
    fn create_set(&self, set: &str) -> PgEdgeResult<()> {
        require_identifier(set, "replication set name")
    }

    fn drop_set(&self, set: &str) -> PgEdgeResult<()> {
        require_identifier(set, "replication set name")
    }

    fn check_set(&self, set: &str) -> PgEdgeResult<String> {
        require_identifier(set, "replication set name")?;
        Ok("active".to_string())
    }
}
