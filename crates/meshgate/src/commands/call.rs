use serde_json::Value;

use meshgate_config::Config;
use meshgate_core::{MeshBridge, Reply};

use super::{load_network, no_network, save_network};
use crate::cli::CallArgs;
use crate::error::CliError;

pub async fn handle(args: CallArgs, config: &Config) -> Result<(), CliError> {
    let path = args
        .network
        .or_else(|| config.network.clone())
        .ok_or_else(no_network)?;

    let arguments = args
        .args
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()?;

    let bridge = MeshBridge::new(config.bridge_config());
    let handle = bridge.register(load_network(&path)?);

    let reply = handle.handle_call(&args.method, arguments.as_ref()).await;
    println!("{}", serde_json::to_string(&reply)?);

    if args.save {
        save_network(&path, &handle.snapshot().await)?;
        tracing::info!(path = %path.display(), "network saved");
    }

    match reply {
        Reply::Error { code, message } => Err(CliError::Call { code, message }),
        Reply::Success(_) | Reply::NotImplemented => Ok(()),
    }
}
