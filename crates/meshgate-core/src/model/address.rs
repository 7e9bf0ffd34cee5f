// ── Mesh addressing ──
//
// 16-bit mesh addresses and the plain/virtual split that gives groups
// their identity. Virtual addresses carry the label UUID they were
// derived from; plain addresses never do.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// A raw 16-bit mesh address.
pub type Address = u16;

/// Index of an application key within the network's key list.
pub type KeyIndex = u16;

pub const MIN_UNICAST_ADDRESS: Address = 0x0001;
pub const MAX_UNICAST_ADDRESS: Address = 0x7FFF;
pub const MIN_VIRTUAL_ADDRESS: Address = 0x8000;
pub const MAX_VIRTUAL_ADDRESS: Address = 0xBFFF;
pub const MIN_GROUP_ADDRESS: Address = 0xC000;
pub const MAX_GROUP_ADDRESS: Address = 0xFEFF;

pub const fn is_unicast(address: Address) -> bool {
    address >= MIN_UNICAST_ADDRESS && address <= MAX_UNICAST_ADDRESS
}

pub const fn is_virtual(address: Address) -> bool {
    address >= MIN_VIRTUAL_ADDRESS && address <= MAX_VIRTUAL_ADDRESS
}

/// Dynamically assignable group address (fixed group addresses excluded).
pub const fn is_group(address: Address) -> bool {
    address >= MIN_GROUP_ADDRESS && address <= MAX_GROUP_ADDRESS
}

/// Every dynamically assignable group address.
pub const GROUP_ADDRESS_SPACE: AddressRange =
    AddressRange::new(MIN_GROUP_ADDRESS, MAX_GROUP_ADDRESS);

// ── MeshAddress ─────────────────────────────────────────────────────

/// A destination address as stored on groups and model subscriptions.
///
/// Two addresses share an identity only when their numeric values match
/// *and* both are plain or both are virtual. A plain `0x8123` never
/// matches a virtual `0x8123`, whatever the label. `PartialEq` and `Hash`
/// follow the same rule, so the label value never takes part in equality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshAddress {
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_label: Option<Uuid>,
}

impl MeshAddress {
    pub const fn new(address: Address) -> Self {
        Self {
            address,
            virtual_label: None,
        }
    }

    /// A virtual address together with the label it was derived from.
    pub const fn with_label(address: Address, label: Uuid) -> Self {
        Self {
            address,
            virtual_label: Some(label),
        }
    }

    pub const fn is_virtual(&self) -> bool {
        self.virtual_label.is_some()
    }

    /// Identity comparison used by every group lookup.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.address == other.address && self.is_virtual() == other.is_virtual()
    }

    /// Label rendered the way the host expects it, if any.
    pub fn label_string(&self) -> Option<String> {
        self.virtual_label.as_ref().map(uuid_string)
    }
}

impl PartialEq for MeshAddress {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other)
    }
}

impl Eq for MeshAddress {}

impl Hash for MeshAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
        self.is_virtual().hash(state);
    }
}

impl From<Address> for MeshAddress {
    fn from(address: Address) -> Self {
        Self::new(address)
    }
}

impl fmt::Display for MeshAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.virtual_label {
            Some(label) => write!(f, "{:#06X} (label {label})", self.address),
            None => write!(f, "{:#06X}", self.address),
        }
    }
}

// ── AddressRange ────────────────────────────────────────────────────

/// Inclusive address range allocated to a provisioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRange {
    pub low_address: Address,
    pub high_address: Address,
}

impl AddressRange {
    pub const fn new(low_address: Address, high_address: Address) -> Self {
        Self {
            low_address,
            high_address,
        }
    }

    /// A range whose bounds are inverted holds no addresses.
    pub const fn is_empty(&self) -> bool {
        self.low_address > self.high_address
    }

    pub const fn contains(&self, address: Address) -> bool {
        address >= self.low_address && address <= self.high_address
    }

    /// Addresses shared by both ranges, or `None` when they do not overlap.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let range = Self::new(
            self.low_address.max(other.low_address),
            self.high_address.min(other.high_address),
        );
        (!range.is_empty()).then_some(range)
    }
}

/// Upper-case hyphenated form used for every UUID crossing the host boundary.
pub fn uuid_string(uuid: &Uuid) -> String {
    uuid.hyphenated().to_string().to_uppercase()
}
