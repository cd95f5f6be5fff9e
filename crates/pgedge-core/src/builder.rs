//! Topology document builders.
//!
//! Two entry points produce the same document shape:
//! - [`build_template`] derives every node from defaults, no questions asked.
//! - [`build_interactive`] walks an operator through per-node details via a
//!   [`Prompter`], including optional replica (sub-node) entries.
//!
//! Nodes are numbered `n1..nN` and receive consecutive ports starting at the
//! chosen base port. Builders do not validate the result; run
//! `crate::validate::validate_document` before persisting.

use tracing::debug;

use crate::config::ClusterEnv;
use crate::defaults;
use crate::errors::{PgEdgeError, PgEdgeResult};
use crate::model::{DatabaseCredential, DatabaseSpec, PrimaryNode, ReplicaNode, TopologyDocument};

/// Source of operator answers.
///
/// Implementations trim the answer and return `default` for empty input.
/// Reaching end of input must be reported as [`PgEdgeError::Prompt`] rather
/// than answered with the default, so that required questions cannot loop.
pub trait Prompter {
    fn ask(&mut self, question: &str, default: &str) -> PgEdgeResult<String>;

    /// Show an informational line to the operator.
    fn say(&mut self, line: &str) -> PgEdgeResult<()>;
}

/// Parameters common to both builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterRequest {
    pub cluster_name: String,
    pub num_nodes: usize,
    pub credential: DatabaseCredential,
}

impl ClusterRequest {
    pub fn new(
        cluster_name: impl Into<String>,
        num_nodes: usize,
        credential: DatabaseCredential,
    ) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            num_nodes,
            credential,
        }
    }

    fn check(&self) -> PgEdgeResult<()> {
        if self.num_nodes == 0 {
            return Err(PgEdgeError::invalid_input(
                "number of nodes must be at least 1",
            ));
        }
        Ok(())
    }

    fn document(&self, pg_version: &str) -> TopologyDocument {
        TopologyDocument::new(
            self.cluster_name.clone(),
            DatabaseSpec::new(pg_version, self.credential.clone()),
        )
    }
}

/// Port of the node at zero-based `index`, checked against the port range.
fn node_port(start_port: u16, index: usize) -> PgEdgeResult<u16> {
    u16::try_from(index)
        .ok()
        .and_then(|i| start_port.checked_add(i))
        .ok_or_else(|| {
            PgEdgeError::invalid_input(format!(
                "port range starting at {start_port} does not fit {} nodes",
                index + 1
            ))
        })
}

/// Build a document from defaults: every node on `127.0.0.1`, no replicas.
pub fn build_template(
    env: &ClusterEnv,
    request: &ClusterRequest,
    pg_version: &str,
    start_port: u16,
) -> PgEdgeResult<TopologyDocument> {
    request.check()?;
    node_port(start_port, request.num_nodes - 1)?;

    let mut doc = request.document(pg_version);
    for i in 0..request.num_nodes {
        let name = format!("n{}", i + 1);
        let path = env.primary_path(&request.cluster_name, &name);
        doc.node_groups.push(PrimaryNode::new(
            name,
            defaults::IP,
            defaults::IP,
            node_port(start_port, i)?,
            path,
        ));
    }

    debug!(
        cluster = %request.cluster_name,
        nodes = request.num_nodes,
        start_port,
        "built topology from template"
    );
    Ok(doc)
}

/// Build a document by asking the operator for version, base port and
/// per-node details.
pub fn build_interactive<P: Prompter + ?Sized>(
    env: &ClusterEnv,
    request: &ClusterRequest,
    prompter: &mut P,
) -> PgEdgeResult<TopologyDocument> {
    request.check()?;

    let pg_version = prompter.ask("Enter PostgreSQL version", defaults::PG_VERSION)?;
    let port_answer = prompter.ask(
        "Enter starting port number",
        &defaults::START_PORT.to_string(),
    )?;
    let start_port: u16 = port_answer
        .parse()
        .map_err(|_| PgEdgeError::invalid_input(format!("invalid port number: {port_answer}")))?;
    node_port(start_port, request.num_nodes - 1)?;

    let mut doc = request.document(&pg_version);
    for i in 0..request.num_nodes {
        let node = prompt_primary(env, request, prompter, i, node_port(start_port, i)?)?;
        doc.node_groups.push(node);
    }
    Ok(doc)
}

fn prompt_primary<P: Prompter + ?Sized>(
    env: &ClusterEnv,
    request: &ClusterRequest,
    prompter: &mut P,
    index: usize,
    port: u16,
) -> PgEdgeResult<PrimaryNode> {
    prompter.say("")?;
    prompter.say(&format!("Node {} details:", index + 1))?;

    let name = prompter.ask("Node name", &format!("n{}", index + 1))?;
    let public_ip = prompter.ask("Enter public IP", defaults::IP)?;
    let private_ip = prompter.ask("Enter private IP", &public_ip)?;
    let path = prompter.ask("Path", &env.primary_path(&request.cluster_name, &name))?;

    let mut node = PrimaryNode::new(name, public_ip, private_ip, port, path);
    node.sub_nodes = prompt_replicas(env, prompter, node.name())?;
    Ok(node)
}

fn prompt_replicas<P: Prompter + ?Sized>(
    env: &ClusterEnv,
    prompter: &mut P,
    parent: &str,
) -> PgEdgeResult<Vec<ReplicaNode>> {
    let mut replicas = Vec::new();

    let confirm = prompter.ask(&format!("Add sub-nodes for {parent}? (yes/no)"), "no")?;
    if !is_yes(&confirm) {
        return Ok(replicas);
    }

    loop {
        prompter.say("")?;
        prompter.say(&format!("Sub-node details for {parent}:"))?;

        let name = prompter.ask("Sub-node name", "")?;
        if name.is_empty() {
            prompter.say("Sub-node name cannot be empty. Try again.")?;
            continue;
        }
        let public_ip = prompter.ask("Enter public IP", defaults::IP)?;
        let path = env.replica_path(parent, &name);
        replicas.push(ReplicaNode::new(name, public_ip.clone(), public_ip, path));

        let another = prompter.ask("Add another sub-node? (yes/no)", "no")?;
        if !is_yes(&another) {
            break;
        }
    }
    Ok(replicas)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "yes" | "y")
}
