use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::address::{Address, AddressRange};

/// An entity allowed to provision devices and allocate addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provisioner {
    pub uuid: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub allocated_unicast_ranges: Vec<AddressRange>,
    #[serde(default)]
    pub allocated_group_ranges: Vec<AddressRange>,
}

impl Provisioner {
    pub fn new(uuid: Uuid, name: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
            allocated_unicast_ranges: Vec::new(),
            allocated_group_ranges: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_unicast_range(mut self, range: AddressRange) -> Self {
        self.allocated_unicast_ranges.push(range);
        self
    }

    #[must_use]
    pub fn with_group_range(mut self, range: AddressRange) -> Self {
        self.allocated_group_ranges.push(range);
        self
    }

    /// Highest `high_address` across the allocated unicast ranges, or 0
    /// when nothing is allocated.
    pub fn highest_allocatable_address(&self) -> Address {
        self.allocated_unicast_ranges
            .iter()
            .map(|range| range.high_address)
            .max()
            .unwrap_or(0)
    }
}
