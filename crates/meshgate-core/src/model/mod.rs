// ── Domain model ──
//
// The subset of a provisioned mesh network the bridge operates on.

pub mod address;
pub mod group;
pub mod network;
pub mod node;
pub mod provisioner;

pub use address::{Address, AddressRange, KeyIndex, MeshAddress, uuid_string};
pub use group::Group;
pub use network::MeshNetwork;
pub use node::{Element, ElementSummary, Model, ModelSummary, Node};
pub use provisioner::Provisioner;
