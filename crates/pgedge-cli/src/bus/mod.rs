//! Message-bus side of `cluster init`.
//!
//! Announcements are fire-and-forget: each node's message is published once,
//! a failure is recorded for that node and publishing moves on. Nothing is
//! acknowledged, retried or rolled back.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use indicatif::ProgressBar;
use pgedge_core::announce::announcements;
use pgedge_core::model::TopologyDocument;
use pgedge_core::PgEdgeError;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

pub mod mqtt;

pub const DEFAULT_BROKER: &str = "tcp://localhost:1883";
const DEFAULT_MQTT_PORT: u16 = 1883;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("invalid broker url {url}: {reason}")]
    InvalidBrokerUrl { url: String, reason: String },

    #[error("failed to connect to broker {broker}: {reason}")]
    Connect { broker: String, reason: String },

    #[error("failed to publish to {topic}: {source}")]
    Publish {
        topic: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid init message: {0}")]
    Message(#[from] PgEdgeError),
}

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub connect_timeout: Duration,
}

impl BrokerConfig {
    /// Parse `tcp://host[:port]` or `mqtt://host[:port]`.
    pub fn parse(url: &str, client_id: String, connect_timeout: Duration) -> Result<Self, BusError> {
        let invalid = |reason: &str| BusError::InvalidBrokerUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let parsed = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "tcp" | "mqtt") {
            return Err(invalid("scheme must be tcp or mqtt"));
        }
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing host"))?;

        Ok(Self {
            host: host.to_string(),
            port: parsed.port().unwrap_or(DEFAULT_MQTT_PORT),
            client_id,
            connect_timeout,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Client id unique per invocation: `pgedgecli-<operator>-<8 hex chars>`.
pub fn default_client_id(operator: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("pgedgecli-{operator}-{}", &suffix[..8])
}

/// Transport used by [`announce`].
///
/// Resolves once the payload has been handed to the broker connection, not
/// merely queued.
pub trait Publisher {
    fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
    ) -> impl Future<Output = Result<(), BusError>> + Send;
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeOutcome {
    pub node: String,
    pub topic: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnounceReport {
    pub cluster: String,
    pub outcomes: Vec<NodeOutcome>,
}

impl AnnounceReport {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.ok).count()
    }
}

impl fmt::Display for AnnounceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for o in &self.outcomes {
            match &o.error {
                None => writeln!(f, "{}: sent on {}", o.node, o.topic)?,
                Some(e) => writeln!(f, "{}: FAILED on {}: {e}", o.node, o.topic)?,
            }
        }
        write!(
            f,
            "{} of {} nodes announced for cluster {}",
            self.outcomes.len() - self.failed(),
            self.outcomes.len(),
            self.cluster
        )
    }
}

/// Publish one init message per primary node of `doc`, in document order.
pub async fn announce<P: Publisher>(
    doc: &TopologyDocument,
    publisher: &P,
    progress: &ProgressBar,
) -> AnnounceReport {
    let pending = announcements(doc);
    progress.set_length(pending.len() as u64);

    let mut outcomes = Vec::with_capacity(pending.len());
    for a in pending {
        progress.set_message(a.node.clone());

        let result = match a.message {
            Ok(message) => match message.to_bytes() {
                Ok(payload) => publisher.publish(&a.topic, payload).await,
                Err(e) => Err(BusError::from(e)),
            },
            Err(e) => Err(BusError::from(e)),
        };

        let outcome = match result {
            Ok(()) => {
                info!(node = %a.node, topic = %a.topic, "initialization message sent");
                NodeOutcome {
                    node: a.node,
                    topic: a.topic,
                    ok: true,
                    error: None,
                }
            }
            Err(e) => {
                warn!(node = %a.node, error = %e, "failed to send initialization message");
                NodeOutcome {
                    node: a.node,
                    topic: a.topic,
                    ok: false,
                    error: Some(e.to_string()),
                }
            }
        };
        outcomes.push(outcome);
        progress.inc(1);
    }

    AnnounceReport {
        cluster: doc.cluster_name.clone(),
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use pgedge_core::builder::{build_template, ClusterRequest};
    use pgedge_core::config::ClusterEnv;
    use pgedge_core::model::DatabaseCredential;

    use super::*;

    /// Records publishes; fails any topic containing `fail_on`.
    struct Recording {
        fail_on: Option<&'static str>,
        sent: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl Recording {
        fn new(fail_on: Option<&'static str>) -> Self {
            Self {
                fail_on,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl Publisher for Recording {
        async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BusError> {
            if self.fail_on.is_some_and(|f| topic.contains(f)) {
                return Err(BusError::Publish {
                    topic: topic.to_string(),
                    source: Box::new(io::Error::new(io::ErrorKind::BrokenPipe, "connection reset")),
                });
            }
            let v = serde_json::from_slice(&payload).unwrap();
            self.sent.lock().unwrap().push((topic.to_string(), v));
            Ok(())
        }
    }

    fn doc(n: usize) -> TopologyDocument {
        let env = ClusterEnv::new("/home/op", "op");
        let req = ClusterRequest::new("demo", n, DatabaseCredential::new("d", "u", "p"));
        build_template(&env, &req, "16", 5432).unwrap()
    }

    #[tokio::test]
    async fn announces_every_primary_in_order() {
        let p = Recording::new(None);
        let report = announce(&doc(3), &p, &ProgressBar::hidden()).await;

        assert_eq!(report.failed(), 0);
        let sent = p.sent.lock().unwrap();
        let topics: Vec<&str> = sent.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(
            topics,
            vec![
                "pgedge/cluster/demo/node/n1/init",
                "pgedge/cluster/demo/node/n2/init",
                "pgedge/cluster/demo/node/n3/init",
            ]
        );
        assert_eq!(sent[1].1["node"]["port"], 5433);
        assert_eq!(sent[1].1["action"], "init");
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_rest() {
        let p = Recording::new(Some("/n2/"));
        let report = announce(&doc(3), &p, &ProgressBar::hidden()).await;

        assert_eq!(report.failed(), 1);
        assert_eq!(p.sent.lock().unwrap().len(), 2);
        let failed = &report.outcomes[1];
        assert_eq!(failed.node, "n2");
        assert!(!failed.ok);
        assert!(failed.error.as_deref().unwrap().contains("connection reset"));

        let text = report.to_string();
        assert!(text.contains("n2: FAILED on pgedge/cluster/demo/node/n2/init"));
        assert!(text.ends_with("2 of 3 nodes announced for cluster demo"));
    }

    #[tokio::test]
    async fn unusable_port_fails_only_that_node() {
        let mut d = doc(3);
        d.node_groups[1].endpoint.port = serde_json::from_value(serde_json::json!("auto")).unwrap();

        let p = Recording::new(None);
        let report = announce(&d, &p, &ProgressBar::hidden()).await;

        assert_eq!(report.failed(), 1);
        let sent = p.sent.lock().unwrap();
        let topics: Vec<&str> = sent.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(
            topics,
            vec!["pgedge/cluster/demo/node/n1/init", "pgedge/cluster/demo/node/n3/init"]
        );
        let failed = &report.outcomes[1];
        assert_eq!(failed.node, "n2");
        assert!(failed.error.as_deref().unwrap().starts_with("invalid init message"));
    }

    #[test]
    fn broker_url_parsing() {
        let t = Duration::from_secs(5);
        let c = BrokerConfig::parse("tcp://broker.local:2883", "id".into(), t).unwrap();
        assert_eq!(c.address(), "broker.local:2883");

        let c = BrokerConfig::parse(DEFAULT_BROKER, "id".into(), t).unwrap();
        assert_eq!((c.host.as_str(), c.port), ("localhost", 1883));

        let c = BrokerConfig::parse("mqtt://10.0.0.7", "id".into(), t).unwrap();
        assert_eq!(c.port, 1883);

        assert!(BrokerConfig::parse("http://x:1", "id".into(), t).is_err());
        assert!(BrokerConfig::parse("localhost:1883", "id".into(), t).is_err());
    }

    #[test]
    fn client_ids_are_unique_and_short() {
        let a = default_client_id("alice");
        let b = default_client_id("alice");
        assert_ne!(a, b);
        assert!(a.starts_with("pgedgecli-alice-"));
        assert_eq!(a.len(), "pgedgecli-alice-".len() + 8);
    }
}
