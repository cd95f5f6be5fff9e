//! Cluster topology document model.
//!
//! These are the strongly-typed Rust representations of the persisted cluster
//! JSON. Field names on the wire are fixed (`json_version`, `cluster_name`,
//! `pgedge`, `node_groups`, `update_date`, `log_level`) so that files written by
//! earlier tooling load unchanged, and files written here load in earlier
//! tooling.
//!
//! Models are mostly "dumb" data. Builders (`crate::builder`) apply defaults,
//! `crate::validate` applies invariants, and `pgedge-store` does the I/O.

mod node;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::version::DocumentVersion;

pub use node::{NodeEndpoint, Port, PrimaryNode, ReplicaNode};

/// On/off switch persisted as `"on"` / `"off"`.
///
/// Any other text found in a file is kept in [`Toggle::Other`] and written
/// back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Toggle {
    On,
    #[default]
    Off,
    Other(String),
}

impl Toggle {
    pub fn as_str(&self) -> &str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Toggle {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "on" => Self::On,
            "off" => Self::Off,
            _ => Self::Other(raw),
        }
    }
}

impl From<Toggle> for String {
    fn from(t: Toggle) -> Self {
        match t {
            Toggle::Other(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sequences written by older tooling may be `null` instead of `[]`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Top-level persisted cluster description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyDocument {
    #[serde(rename = "json_version")]
    pub schema_version: String,

    pub cluster_name: String,

    #[serde(rename = "pgedge")]
    pub database: DatabaseSpec,

    /// Primary nodes in display and port-assignment order.
    #[serde(deserialize_with = "null_as_empty")]
    pub node_groups: Vec<PrimaryNode>,

    /// RFC 3339 timestamp stamped by the store on every write.
    #[serde(rename = "update_date")]
    pub updated_at: String,

    pub log_level: String,
}

impl TopologyDocument {
    /// Create an empty document at the current version with default log level.
    pub fn new(cluster_name: impl Into<String>, database: DatabaseSpec) -> Self {
        Self {
            schema_version: DocumentVersion::CURRENT.as_str().to_string(),
            cluster_name: cluster_name.into(),
            database,
            node_groups: Vec::new(),
            updated_at: String::new(),
            log_level: crate::defaults::LOG_LEVEL.to_string(),
        }
    }

    /// Names of the primary nodes, in document order.
    pub fn node_names(&self) -> Vec<&str> {
        self.node_groups
            .iter()
            .map(|n| n.endpoint.name.as_str())
            .collect()
    }

    /// Every endpoint in the document, primaries before their replicas,
    /// depth-first.
    pub fn endpoints(&self) -> Vec<&NodeEndpoint> {
        let mut out = Vec::new();
        for primary in &self.node_groups {
            out.push(&primary.endpoint);
            for replica in &primary.sub_nodes {
                replica.collect_endpoints(&mut out);
            }
        }
        out
    }

    /// Copy of this document with `update_date` cleared, for comparisons that
    /// should ignore when the file was written.
    pub fn without_timestamp(&self) -> Self {
        Self {
            updated_at: String::new(),
            ..self.clone()
        }
    }
}

/// Database engine settings (`pgedge` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSpec {
    #[serde(rename = "pg_version")]
    pub engine_version: String,

    pub auto_start: Toggle,

    #[serde(rename = "spock")]
    pub replication: SpockSpec,

    #[serde(rename = "databases", deserialize_with = "null_as_empty")]
    pub credentials: Vec<DatabaseCredential>,
}

impl DatabaseSpec {
    /// Engine settings with a single database, auto-start and auto-DDL off.
    pub fn new(engine_version: impl Into<String>, credential: DatabaseCredential) -> Self {
        Self {
            engine_version: engine_version.into(),
            auto_start: Toggle::Off,
            replication: SpockSpec::default(),
            credentials: vec![credential],
        }
    }
}

/// Spock logical replication settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpockSpec {
    #[serde(rename = "spock_version")]
    pub version: String,

    pub auto_ddl: Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseCredential {
    #[serde(rename = "db_name")]
    pub name: String,

    #[serde(rename = "db_user")]
    pub user: String,

    #[serde(rename = "db_password")]
    pub password: String,
}

impl DatabaseCredential {
    pub fn new(
        name: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            user: user.into(),
            password: password.into(),
        }
    }
}
