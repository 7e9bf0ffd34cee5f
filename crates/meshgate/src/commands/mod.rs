//! Subcommand handlers and the network-document helpers they share.

mod call;
mod channels;
mod serve;

use std::path::{Path, PathBuf};

use meshgate_config::Config;
use meshgate_core::{CoreError, MeshNetwork};

use crate::cli::{Command, NetworkArgs};
use crate::error::CliError;

pub async fn dispatch(cmd: Command, config: &Config) -> Result<(), CliError> {
    match cmd {
        Command::Serve(args) => serve::handle(&args, config).await,
        Command::Call(args) => call::handle(args, config).await,
        Command::Channels(args) => channels::handle(&args, config),
    }
}

/// Network files from the command line, falling back to the configured one.
fn network_paths(args: &NetworkArgs, config: &Config) -> Result<Vec<PathBuf>, CliError> {
    if !args.network.is_empty() {
        return Ok(args.network.clone());
    }
    config
        .network
        .clone()
        .map(|path| vec![path])
        .ok_or_else(no_network)
}

fn no_network() -> CliError {
    CliError::NoNetwork {
        path: meshgate_config::config_path().display().to_string(),
    }
}

fn load_network(path: &Path) -> Result<MeshNetwork, CliError> {
    let document = std::fs::read_to_string(path).map_err(|source| CliError::NetworkIo {
        path: path.display().to_string(),
        source,
    })?;

    MeshNetwork::from_json(&document).map_err(|err| match err {
        CoreError::InvalidNetwork { message } => CliError::InvalidNetwork {
            path: path.display().to_string(),
            message,
        },
        other => other.into(),
    })
}

fn save_network(path: &Path, network: &MeshNetwork) -> Result<(), CliError> {
    let document = serde_json::to_string_pretty(network)?;
    std::fs::write(path, document).map_err(|source| CliError::NetworkIo {
        path: path.display().to_string(),
        source,
    })
}
