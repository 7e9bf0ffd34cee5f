// ── Bridge facade ──
//
// Registry of network instances and the entry point for host calls.
// Each network is owned by one `NetworkHandle`; its mutex is held for the
// whole parse → execute → encode pass so every call sees a consistent
// network and mutations are serialized per network.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::adapter;
use crate::command::Command;
use crate::config::BridgeConfig;
use crate::error::CoreError;
use crate::events::{EventPublisher, EventSubscription};
use crate::model::MeshNetwork;
use crate::reply::{self, Reply};

// ── NetworkHandle ───────────────────────────────────────────────────

/// Sole owner of one network instance and its event sink.
pub struct NetworkHandle {
    id: String,
    network: Mutex<MeshNetwork>,
    events: EventPublisher,
}

impl NetworkHandle {
    pub fn new(network: MeshNetwork) -> Self {
        Self {
            id: network.id.clone(),
            network: Mutex::new(network),
            events: EventPublisher::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Handle one host call and produce its reply. Never fails.
    pub async fn handle_call(&self, method: &str, arguments: Option<&Value>) -> Reply {
        debug!(network = %self.id, method, "received host call");

        let command = Command::parse(method, arguments);
        let resolved = command.method();
        let mutation = command.is_mutation();

        let result = {
            let mut network = self.network.lock().await;
            adapter::execute(command, &mut network, &self.events)
        };

        match &result {
            Err(CoreError::UnrecognizedCommand { .. }) => {
                warn!(network = %self.id, method, "method not implemented");
            }
            Err(err) => {
                warn!(network = %self.id, method, kind = %err.kind(), error = %err, "call failed");
            }
            Ok(_) if mutation => debug!(network = %self.id, method, "network updated"),
            Ok(_) => {}
        }

        reply::encode(resolved, result)
    }

    /// Clone of the current network state.
    pub async fn snapshot(&self) -> MeshNetwork {
        self.network.lock().await.clone()
    }

    /// Install a new event sink for this network, replacing any previous one.
    pub fn subscribe(&self) -> EventSubscription {
        info!(network = %self.id, "event stream subscribed");
        self.events.subscribe()
    }

    pub fn cancel_subscription(&self) {
        info!(network = %self.id, "event stream cancelled");
        self.events.cancel();
    }

    pub fn events(&self) -> &EventPublisher {
        &self.events
    }
}

// ── MeshBridge ──────────────────────────────────────────────────────

/// The main entry point for hosts.
///
/// Cheaply cloneable via `Arc<BridgeInner>`. Networks are addressed by
/// their identifier, matching the per-network channel names.
#[derive(Clone)]
pub struct MeshBridge {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    config: BridgeConfig,
    networks: DashMap<String, Arc<NetworkHandle>>,
}

impl MeshBridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                config,
                networks: DashMap::new(),
            }),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    /// Take ownership of `network`. A network already registered under the
    /// same id is replaced, and its event sink goes with it.
    pub fn register(&self, network: MeshNetwork) -> Arc<NetworkHandle> {
        let handle = Arc::new(NetworkHandle::new(network));
        let id = handle.id().to_owned();
        info!(
            network = %id,
            methods = %self.inner.config.method_channel_name(&id),
            events = %self.inner.config.event_channel_name(&id),
            "network registered"
        );
        if self
            .inner
            .networks
            .insert(id.clone(), Arc::clone(&handle))
            .is_some()
        {
            warn!(network = %id, "replaced an already registered network");
        }
        handle
    }

    pub fn unregister(&self, network_id: &str) -> Option<Arc<NetworkHandle>> {
        let removed = self.inner.networks.remove(network_id).map(|(_, h)| h);
        if let Some(handle) = &removed {
            handle.cancel_subscription();
            info!(network = %network_id, "network unregistered");
        }
        removed
    }

    pub fn network(&self, network_id: &str) -> Option<Arc<NetworkHandle>> {
        self.inner
            .networks
            .get(network_id)
            .map(|r| Arc::clone(r.value()))
    }

    pub fn require_network(&self, network_id: &str) -> Result<Arc<NetworkHandle>, CoreError> {
        self.network(network_id)
            .ok_or_else(|| CoreError::UnknownNetwork {
                network_id: network_id.to_owned(),
            })
    }

    /// Registered network ids, sorted.
    pub fn network_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.networks.iter().map(|r| r.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Route a host call to the named network.
    pub async fn handle_call(
        &self,
        network_id: &str,
        method: &str,
        arguments: Option<&Value>,
    ) -> Result<Reply, CoreError> {
        let handle = self.require_network(network_id)?;
        Ok(handle.handle_call(method, arguments).await)
    }

    pub fn subscribe(&self, network_id: &str) -> Result<EventSubscription, CoreError> {
        Ok(self.require_network(network_id)?.subscribe())
    }

    pub fn cancel_subscription(&self, network_id: &str) -> Result<(), CoreError> {
        self.require_network(network_id)?.cancel_subscription();
        Ok(())
    }

    pub fn method_channel_name(&self, network_id: &str) -> String {
        self.inner.config.method_channel_name(network_id)
    }

    pub fn event_channel_name(&self, network_id: &str) -> String {
        self.inner.config.event_channel_name(network_id)
    }
}

impl Default for MeshBridge {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}
