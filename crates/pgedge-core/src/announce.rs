//! Cluster initialization announcements.
//!
//! One message per primary node, addressed to
//! `pgedge/cluster/<cluster>/node/<node>/init`. Replicas are not announced on
//! their own. Transport is the caller's concern; this module only derives
//! topics and payloads from a loaded document.

use serde::{Deserialize, Serialize};

use crate::errors::{PgEdgeError, PgEdgeResult};
use crate::model::{PrimaryNode, TopologyDocument};

pub const INIT_ACTION: &str = "init";

/// Topic on which `node` of `cluster` receives its init message.
pub fn init_topic(cluster_name: &str, node_name: &str) -> String {
    format!("pgedge/cluster/{cluster_name}/node/{node_name}/init")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitMessage {
    pub action: String,
    pub node: InitNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitNode {
    pub name: String,
    pub public_ip: String,
    pub private_ip: String,
    pub port: u16,
    pub path: String,
    pub pg_version: String,
    pub spock_ver: String,
}

impl InitMessage {
    /// Fails if the node's port is not a number, since the payload carries
    /// it as one.
    pub fn for_node(doc: &TopologyDocument, node: &PrimaryNode) -> PgEdgeResult<Self> {
        let e = &node.endpoint;
        let port = e.port.number().ok_or_else(|| {
            PgEdgeError::invalid_input(format!("node {} has invalid port {:?}", e.name, e.port.as_str()))
        })?;
        Ok(Self {
            action: INIT_ACTION.to_string(),
            node: InitNode {
                name: e.name.clone(),
                public_ip: e.public_ip.clone(),
                private_ip: e.private_ip.clone(),
                port,
                path: e.path.clone(),
                pg_version: doc.database.engine_version.clone(),
                spock_ver: doc.database.replication.version.clone(),
            },
        })
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// A message ready to publish, or the reason it could not be built.
#[derive(Debug)]
pub struct Announcement {
    pub node: String,
    pub topic: String,
    pub message: PgEdgeResult<InitMessage>,
}

/// Announcements for every primary node, in document order.
pub fn announcements(doc: &TopologyDocument) -> Vec<Announcement> {
    doc.node_groups
        .iter()
        .map(|node| Announcement {
            node: node.name().to_string(),
            topic: init_topic(&doc.cluster_name, node.name()),
            message: InitMessage::for_node(doc, node),
        })
        .collect()
}
