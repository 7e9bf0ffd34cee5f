// ── Provisioned nodes ──
//
// Read-only projection of the node → element → model tree. The bridge
// only ever queries this structure; it never reshapes it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::address::{Address, KeyIndex, MeshAddress};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub uuid: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    /// Address of the primary element; the others follow consecutively.
    pub unicast_address: Address,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Node {
    pub fn new(uuid: Uuid, unicast_address: Address) -> Self {
        Self {
            uuid,
            name: None,
            unicast_address,
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Unicast address of the element at `index`.
    pub fn element_address(&self, index: usize) -> Address {
        let offset = u16::try_from(index).unwrap_or(u16::MAX);
        self.unicast_address.saturating_add(offset)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    #[serde(default)]
    pub name: Option<String>,
    /// GATT namespace location descriptor.
    #[serde(default)]
    pub location: u16,
    #[serde(default)]
    pub models: Vec<Model>,
}

impl Element {
    pub fn new(name: Option<String>, location: u16) -> Self {
        Self {
            name,
            location,
            models: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: Model) -> Self {
        self.models.push(model);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// SIG model id in the low 16 bits, company id in the high 16 bits for
    /// vendor models.
    pub model_id: u32,
    #[serde(default)]
    pub subscriptions: Vec<MeshAddress>,
    #[serde(default)]
    pub publish_address: Option<MeshAddress>,
    #[serde(default)]
    pub bound_application_keys: Vec<KeyIndex>,
}

impl Model {
    pub fn new(model_id: u32) -> Self {
        Self {
            model_id,
            subscriptions: Vec::new(),
            publish_address: None,
            bound_application_keys: Vec::new(),
        }
    }

    #[must_use]
    pub fn subscribed_to(mut self, address: MeshAddress) -> Self {
        self.subscriptions.push(address);
        self
    }

    #[must_use]
    pub fn publishing_to(mut self, address: MeshAddress) -> Self {
        self.publish_address = Some(address);
        self
    }

    #[must_use]
    pub fn bound_to(mut self, key_index: KeyIndex) -> Self {
        self.bound_application_keys.push(key_index);
        self
    }

    pub fn is_subscribed_to(&self, address: &MeshAddress) -> bool {
        self.subscriptions.iter().any(|s| s.same_identity(address))
    }

    pub fn publishes_to(&self, address: &MeshAddress) -> bool {
        self.publish_address
            .as_ref()
            .is_some_and(|p| p.same_identity(address))
    }
}

// ── Aggregated views ────────────────────────────────────────────────

/// An element together with the subset of its models that matched a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSummary {
    pub name: Option<String>,
    pub address: Address,
    pub location: u16,
    pub models: Vec<ModelSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSummary {
    pub subscriptions: Vec<Address>,
    pub bound_application_keys: Vec<KeyIndex>,
}

impl From<&Model> for ModelSummary {
    fn from(model: &Model) -> Self {
        Self {
            subscriptions: model.subscriptions.iter().map(|s| s.address).collect(),
            bound_application_keys: model.bound_application_keys.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_addresses_follow_primary() {
        let node = Node::new(Uuid::nil(), 0x0010)
            .with_element(Element::default())
            .with_element(Element::default());
        assert_eq!(node.element_address(0), 0x0010);
        assert_eq!(node.element_address(1), 0x0011);
    }

    #[test]
    fn subscription_match_respects_virtual_flag() {
        let model = Model::new(0x1000).subscribed_to(MeshAddress::new(0xC001));
        assert!(model.is_subscribed_to(&MeshAddress::new(0xC001)));
        assert!(!model.is_subscribed_to(&MeshAddress::with_label(0xC001, Uuid::nil())));
    }

    #[test]
    fn model_summary_flattens_addresses() {
        let label = Uuid::nil();
        let model = Model::new(0x1000)
            .subscribed_to(MeshAddress::new(0xC001))
            .subscribed_to(MeshAddress::with_label(0x8123, label))
            .bound_to(0)
            .bound_to(3);
        let summary = ModelSummary::from(&model);
        assert_eq!(summary.subscriptions, vec![0xC001, 0x8123]);
        assert_eq!(summary.bound_application_keys, vec![0, 3]);
    }
}
