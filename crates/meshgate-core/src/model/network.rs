// ── Mesh network aggregate ──
//
// Owns provisioners, nodes and groups for one network instance and
// enforces the group invariants: unique addresses, lowest-free-slot
// allocation, and no removal while something still references a group.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::address::{Address, AddressRange, GROUP_ADDRESS_SPACE, MeshAddress, is_unicast};
use super::group::Group;
use super::node::{ElementSummary, ModelSummary, Node};
use super::provisioner::Provisioner;
use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshNetwork {
    pub id: String,
    #[serde(default)]
    pub mesh_name: Option<String>,
    /// The first provisioner is the local one.
    #[serde(default)]
    pub provisioners: Vec<Provisioner>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    groups: Vec<Group>,
}

impl MeshNetwork {
    pub fn new(id: impl Into<String>, mesh_name: Option<String>) -> Self {
        Self {
            id: id.into(),
            mesh_name,
            provisioners: Vec::new(),
            nodes: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Parse a network document and check its group invariants.
    pub fn from_json(document: &str) -> Result<Self, CoreError> {
        let network: Self =
            serde_json::from_str(document).map_err(|e| CoreError::InvalidNetwork {
                message: e.to_string(),
            })?;
        network.validate()?;
        Ok(network)
    }

    /// Check invariants that deserialization alone cannot enforce.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(node) = self.nodes.iter().find(|n| !is_unicast(n.unicast_address)) {
            return Err(CoreError::InvalidNetwork {
                message: format!(
                    "node {} has non-unicast address {:#06X}",
                    node.uuid, node.unicast_address
                ),
            });
        }
        for (index, group) in self.groups.iter().enumerate() {
            Group::new(group.name.clone(), group.address).map_err(|e| {
                CoreError::InvalidNetwork {
                    message: format!("group '{}': {e}", group.name),
                }
            })?;
            let duplicate = self.groups[..index]
                .iter()
                .any(|other| other.address.same_identity(&group.address));
            if duplicate {
                return Err(CoreError::InvalidNetwork {
                    message: format!("duplicate group address {}", group.address),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn with_provisioner(mut self, provisioner: Provisioner) -> Self {
        self.provisioners.push(provisioner);
        self
    }

    #[must_use]
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn local_provisioner(&self) -> Option<&Provisioner> {
        self.provisioners.first()
    }

    // ── Groups ───────────────────────────────────────────────────────

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, address: &MeshAddress) -> Option<&Group> {
        self.groups
            .iter()
            .find(|g| g.address.same_identity(address))
    }

    /// Lowest free plain group address the provisioner may allocate.
    ///
    /// Ranges are clipped to the dynamic group space and tried from the
    /// lowest `low_address` upwards, whatever order they were declared in.
    pub fn next_available_group_address(&self, provisioner: &Provisioner) -> Option<Address> {
        let taken: BTreeSet<Address> = self
            .groups
            .iter()
            .filter(|g| !g.address.is_virtual())
            .map(|g| g.address.address)
            .collect();

        let mut ranges: Vec<AddressRange> = provisioner
            .allocated_group_ranges
            .iter()
            .filter_map(|range| range.intersection(&GROUP_ADDRESS_SPACE))
            .collect();
        ranges.sort_by_key(|range| range.low_address);

        ranges.into_iter().find_map(|range| {
            let mut candidate = range.low_address;
            for &used in taken.range(range.low_address..=range.high_address) {
                if used != candidate {
                    break;
                }
                candidate = candidate.checked_add(1)?;
            }
            range.contains(candidate).then_some(candidate)
        })
    }

    pub fn add_group(&mut self, group: Group) -> Result<(), CoreError> {
        if self.group(&group.address).is_some() {
            return Err(CoreError::GroupAlreadyExists {
                address: group.address,
            });
        }
        self.groups.push(group);
        Ok(())
    }

    /// Remove the group at `address`, refusing while it is still referenced.
    pub fn remove_group(&mut self, address: &MeshAddress) -> Result<Group, CoreError> {
        let index = self
            .groups
            .iter()
            .position(|g| g.address.same_identity(address))
            .ok_or(CoreError::GroupNotFound { address: *address })?;

        if self.is_group_in_use(address) {
            return Err(CoreError::GroupInUse { address: *address });
        }

        Ok(self.groups.remove(index))
    }

    /// A group is in use while any model subscribes or publishes to it, or
    /// another group names it as parent.
    pub fn is_group_in_use(&self, address: &MeshAddress) -> bool {
        let referenced_by_model = self
            .nodes
            .iter()
            .flat_map(|node| &node.elements)
            .flat_map(|element| &element.models)
            .any(|model| model.is_subscribed_to(address) || model.publishes_to(address));

        referenced_by_model
            || self.groups.iter().any(|g| {
                g.parent_address
                    .as_ref()
                    .is_some_and(|parent| parent.same_identity(address))
            })
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Every element, in node order, that has at least one model
    /// subscribed to `address`, with only the matching models.
    pub fn elements_subscribed_to(&self, address: &MeshAddress) -> Vec<ElementSummary> {
        let mut elements = Vec::new();
        for node in &self.nodes {
            for (index, element) in node.elements.iter().enumerate() {
                let models: Vec<ModelSummary> = element
                    .models
                    .iter()
                    .filter(|model| model.is_subscribed_to(address))
                    .map(ModelSummary::from)
                    .collect();
                if models.is_empty() {
                    continue;
                }
                elements.push(ElementSummary {
                    name: element.name.clone(),
                    address: node.element_address(index),
                    location: element.location,
                    models,
                });
            }
        }
        elements
    }
}
