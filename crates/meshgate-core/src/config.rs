// ── Runtime bridge configuration ──
//
// Describes how the bridge names its per-network channels. Never touches
// disk: hosts build a `BridgeConfig` (usually via `meshgate-config`) and
// hand it in.

/// Default prefix shared by every channel the bridge exposes.
pub const DEFAULT_CHANNEL_PREFIX: &str = "meshgate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Leading segment of every method and event channel name.
    pub channel_prefix: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel_prefix: DEFAULT_CHANNEL_PREFIX.into(),
        }
    }
}

impl BridgeConfig {
    /// Name of the channel carrying method calls for `network_id`.
    pub fn method_channel_name(&self, network_id: &str) -> String {
        format!("{}/mesh_network/{network_id}/methods", self.channel_prefix)
    }

    /// Name of the channel carrying push events for `network_id`.
    pub fn event_channel_name(&self, network_id: &str) -> String {
        format!("{}/mesh_network/{network_id}/events", self.channel_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_names_embed_network_id() {
        let config = BridgeConfig::default();
        assert_eq!(
            config.method_channel_name("abc"),
            "meshgate/mesh_network/abc/methods"
        );
        assert_eq!(
            config.event_channel_name("abc"),
            "meshgate/mesh_network/abc/events"
        );
    }
}
