//! Command dispatch between a host application and provisioned mesh networks.
//!
//! The host sends string-named calls with loosely-typed argument maps; this
//! crate turns them into typed domain operations and fixed reply shapes:
//!
//! - **[`MeshBridge`]**: registry of network instances keyed by network id.
//!   [`handle_call()`](MeshBridge::handle_call) routes a call to its
//!   [`NetworkHandle`], which owns the network behind a single mutex.
//!
//! - **[`Command`]**: closed set of operations, produced by
//!   [`Command::parse`] from the method name and argument map. Arguments
//!   are decoded into per-command records (see [`command::requests`]);
//!   unknown names and bad arguments become explicit variants.
//!
//! - **[`adapter`]**: executes a command against a [`MeshNetwork`]:
//!   address lookup, group allocation and removal, element/model
//!   aggregation.
//!
//! - **[`Reply`]**: the host-facing result, built by [`reply::encode`].
//!   Domain failures degrade to `false`/`null` payloads.
//!
//! - **[`EventPublisher`]**: single-subscriber push channel per network.
//!   Mutations publish [`MeshEvent`]s; nothing is buffered for absent
//!   subscribers.

pub mod adapter;
pub mod bridge;
pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod reply;

// ── Primary re-exports ──────────────────────────────────────────────
pub use bridge::{MeshBridge, NetworkHandle};
pub use command::{ArgumentError, Command, CommandResult, Method};
pub use config::BridgeConfig;
pub use error::{CoreError, ErrorKind};
pub use events::{EventPublisher, EventStream, EventSubscription, MeshEvent};
pub use reply::Reply;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Address, AddressRange, Element, ElementSummary, Group, KeyIndex, MeshAddress, MeshNetwork,
    Model, ModelSummary, Node, Provisioner,
};
