use meshgate_config::Config;
use meshgate_core::BridgeConfig;

use super::{load_network, network_paths};
use crate::cli::NetworkArgs;
use crate::error::CliError;

pub fn handle(args: &NetworkArgs, config: &Config) -> Result<(), CliError> {
    let bridge_config: BridgeConfig = config.bridge_config();

    for path in network_paths(args, config)? {
        let network = load_network(&path)?;
        println!("{}", network.id);
        println!("  methods: {}", bridge_config.method_channel_name(&network.id));
        println!("  events:  {}", bridge_config.event_channel_name(&network.id));
    }
    Ok(())
}
