use anyhow::{anyhow, Result};
use pgedge_core::cluster::PlaceholderBackend;
use pgedge_core::config::{validate_env, ClusterEnv};

use crate::args::{Cli, ClusterCommand, Command, SpockCommand};

mod create_json;
mod init;
mod nodes;
mod spock;
mod version;

pub async fn dispatch(cli: Cli) -> Result<()> {
    let backend = PlaceholderBackend;
    match &cli.command {
        Command::Cluster(cmd) => {
            let env = resolve_env(&cli)?;
            match cmd.clone() {
                ClusterCommand::CreateJson {
                    cluster_name,
                    num_nodes,
                    db_name,
                    db_user,
                    db_password,
                    defaults,
                    pg_version,
                    port,
                } => {
                    let req = create_json::Request {
                        cluster_name,
                        num_nodes,
                        db_name,
                        db_user,
                        db_password,
                    };
                    let mode = if defaults {
                        create_json::Mode::Template { pg_version, port }
                    } else {
                        create_json::Mode::Interactive
                    };
                    create_json::run(&env, req, mode)
                }
                ClusterCommand::Init {
                    cluster_name,
                    broker,
                    client_id,
                    connect_timeout,
                } => init::run(&env, &cluster_name, &broker, client_id, connect_timeout).await,
                ClusterCommand::AddNode { node } => nodes::add(&backend, &node),
                ClusterCommand::RemoveNode { node } => nodes::remove(&backend, &node),
                ClusterCommand::ListNodes => nodes::list(&backend),
            }
        }
        Command::Spock(cmd) => match cmd {
            SpockCommand::CreateSet { set } => spock::create_set(&backend, set),
            SpockCommand::DropSet { set } => spock::drop_set(&backend, set),
            SpockCommand::CheckSet { set } => spock::check_set(&backend, set),
        },
        Command::Version => version::run(),
    }
}

/// Operator environment from `--home`/`PGEDGE_HOME` (or the user's home
/// directory) and `--user`/`USER`.
fn resolve_env(cli: &Cli) -> Result<ClusterEnv> {
    let home = match &cli.home {
        Some(home) => home.clone(),
        None => dirs::home_dir()
            .ok_or_else(|| anyhow!("unable to get home directory; pass --home or set PGEDGE_HOME"))?,
    };
    let env = ClusterEnv::new(home, cli.user.clone());
    validate_env(&env)?;
    Ok(env)
}
