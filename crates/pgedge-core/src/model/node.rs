//! Node entries of a topology document.
//!
//! On the wire every node group has the same shape and replicas nest under
//! `sub_nodes`. In Rust the two roles are distinct types: a [`PrimaryNode`]
//! is an active, addressable instance; a [`ReplicaNode`] is a passive replica
//! that is always created inactive on the fixed replica port.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{null_as_empty, Toggle};

/// Fields shared by primaries and replicas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEndpoint {
    pub name: String,

    #[serde(rename = "is_active")]
    pub active: Toggle,

    pub public_ip: String,

    pub private_ip: String,

    pub port: Port,

    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryNode {
    #[serde(flatten)]
    pub endpoint: NodeEndpoint,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub sub_nodes: Vec<ReplicaNode>,
}

impl PrimaryNode {
    /// An active primary with no replicas.
    pub fn new(
        name: impl Into<String>,
        public_ip: impl Into<String>,
        private_ip: impl Into<String>,
        port: u16,
        path: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: NodeEndpoint {
                name: name.into(),
                active: Toggle::On,
                public_ip: public_ip.into(),
                private_ip: private_ip.into(),
                port: Port::from(port),
                path: path.into(),
            },
            sub_nodes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.endpoint.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaNode {
    #[serde(flatten)]
    pub endpoint: NodeEndpoint,

    /// Nested replicas are accepted on load so that any existing file
    /// round-trips; builders never produce them.
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub sub_nodes: Vec<ReplicaNode>,
}

impl ReplicaNode {
    /// An inactive replica on the fixed replica port.
    pub fn new(
        name: impl Into<String>,
        public_ip: impl Into<String>,
        private_ip: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: NodeEndpoint {
                name: name.into(),
                active: Toggle::Off,
                public_ip: public_ip.into(),
                private_ip: private_ip.into(),
                port: Port::from(crate::defaults::REPLICA_PORT),
                path: path.into(),
            },
            sub_nodes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.endpoint.name
    }

    pub(crate) fn collect_endpoints<'a>(&'a self, out: &mut Vec<&'a NodeEndpoint>) {
        out.push(&self.endpoint);
        for nested in &self.sub_nodes {
            nested.collect_endpoints(out);
        }
    }
}

/// Node port exactly as written in the file.
///
/// Files store ports as strings and hand-edited files may hold anything, so
/// the text is kept verbatim and written back unchanged. [`Port::number`]
/// parses it where a numeric port is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Port(String);

impl Port {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The port as a number, if the text is a decimal in `0..=65535`.
    pub fn number(&self) -> Option<u16> {
        self.0.parse().ok()
    }
}

impl From<u16> for Port {
    fn from(port: u16) -> Self {
        Self(port.to_string())
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Port {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Port {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PortVisitor)
    }
}

/// Strings are kept as-is. Unquoted integers, seen in some hand-edited
/// files, are accepted and stored in decimal.
struct PortVisitor;

impl<'de> serde::de::Visitor<'de> for PortVisitor {
    type Value = Port;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a port as a string or integer")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Port, E> {
        Ok(Port(v.to_string()))
    }

    fn visit_string<E: serde::de::Error>(self, v: String) -> Result<Port, E> {
        Ok(Port(v))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Port, E> {
        Ok(Port(v.to_string()))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Port, E> {
        Ok(Port(v.to_string()))
    }
}
