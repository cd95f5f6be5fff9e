use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pgedgecli",
    version,
    about = "A CLI for managing pgEdge PostgreSQL clusters"
)]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding the cluster/ tree and default node paths
    /// (default: the current user's home directory).
    #[arg(long, global = true, env = "PGEDGE_HOME")]
    pub home: Option<PathBuf>,

    /// Operator name used in broker client ids.
    #[arg(long, global = true, env = "USER", default_value = "pgedge")]
    pub user: String,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage PostgreSQL clusters.
    #[command(subcommand)]
    Cluster(ClusterCommand),

    /// Manage Spock logical replication sets.
    #[command(subcommand)]
    Spock(SpockCommand),

    /// Print the version number of pgedgecli.
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ClusterCommand {
    /// Create a cluster JSON configuration file.
    CreateJson {
        cluster_name: String,
        num_nodes: usize,
        db_name: String,
        db_user: String,
        db_password: String,

        /// Skip prompts and generate every node from defaults.
        #[arg(long)]
        defaults: bool,

        /// PostgreSQL version used with --defaults.
        #[arg(long, default_value = pgedge_core::defaults::PG_VERSION, requires = "defaults")]
        pg_version: String,

        /// Starting port used with --defaults.
        #[arg(long, default_value_t = pgedge_core::defaults::START_PORT, requires = "defaults")]
        port: u16,
    },

    /// Publish an init message to every node of a cluster.
    Init {
        cluster_name: String,

        /// MQTT broker URL.
        #[arg(long, env = "PGEDGE_BROKER", default_value = crate::bus::DEFAULT_BROKER)]
        broker: String,

        /// MQTT client id (default: pgedgecli-<user>-<random>).
        #[arg(long)]
        client_id: Option<String>,

        /// Seconds to wait for the broker to accept the connection.
        #[arg(long, default_value_t = 10)]
        connect_timeout: u64,
    },

    /// Add a node to the cluster.
    AddNode {
        #[arg(long, default_value = "")]
        node: String,
    },

    /// Remove a node from the cluster.
    RemoveNode {
        #[arg(long, default_value = "")]
        node: String,
    },

    /// List all nodes in the cluster.
    ListNodes,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SpockCommand {
    /// Create a replication set.
    CreateSet {
        #[arg(long, default_value = "")]
        set: String,
    },

    /// Drop a replication set.
    DropSet {
        #[arg(long, default_value = "")]
        set: String,
    },

    /// Check the status of a replication set.
    CheckSet {
        #[arg(long, default_value = "")]
        set: String,
    },
}
