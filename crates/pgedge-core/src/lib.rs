//! pgedge-core
//!
//! Core primitives for pgedgecli:
//! - Cluster topology document model (`json_version` 1.1)
//! - Interactive and template builders
//! - Validation of document invariants
//! - Per-node announcement messages
//! - Node membership and replication-set extension points
//!
//! The crate performs no filesystem or network I/O and never reads the
//! process environment. Persistence lives in `pgedge-store`.

pub mod announce;
pub mod builder;
pub mod cluster;
pub mod config;
pub mod errors;
pub mod model;
pub mod spock;
pub mod validate;
pub mod version;

pub use crate::errors::{PgEdgeError, PgEdgeResult};

/// Topology document version written and accepted by this implementation.
pub const JSON_VERSION: &str = "1.1";

/// Builder defaults.
/// These shape newly generated documents and must remain stable.
pub mod defaults {
    /// PostgreSQL major version offered when the operator does not pick one.
    pub const PG_VERSION: &str = "16";
    /// First port handed out to primary nodes.
    pub const START_PORT: u16 = 5432;
    /// Fixed port of every replica node.
    pub const REPLICA_PORT: u16 = 5432;
    /// Address used when the operator does not provide one.
    pub const IP: &str = "127.0.0.1";
    pub const LOG_LEVEL: &str = "debug";
}

/// Convenience re-exports.
pub mod prelude {
    pub use crate::announce::{announcements, Announcement, InitMessage};
    pub use crate::builder::{build_interactive, build_template, ClusterRequest, Prompter};
    pub use crate::config::ClusterEnv;
    pub use crate::model::{
        DatabaseCredential, DatabaseSpec, NodeEndpoint, Port, PrimaryNode, ReplicaNode,
        SpockSpec, Toggle, TopologyDocument,
    };
    pub use crate::validate::{lint_document, validate_document, LintFinding};
    pub use crate::{PgEdgeError, PgEdgeResult};
}
