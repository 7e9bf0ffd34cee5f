use serde::{Deserialize, Serialize};

use super::address::{MeshAddress, is_group, is_virtual};
use crate::error::CoreError;

/// An addressable collection that models subscribe to.
///
/// Membership lives on the models (their subscription lists), not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    pub address: MeshAddress,
    #[serde(default)]
    pub parent_address: Option<MeshAddress>,
}

impl Group {
    /// Build a group, rejecting blank names and addresses outside the
    /// group space (plain) or virtual space (labelled).
    pub fn new(name: impl Into<String>, address: MeshAddress) -> Result<Self, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::InvalidGroupName);
        }

        let valid = if address.is_virtual() {
            is_virtual(address.address)
        } else {
            is_group(address.address)
        };
        if !valid {
            return Err(CoreError::InvalidGroupAddress { address });
        }

        Ok(Self {
            name,
            address,
            parent_address: None,
        })
    }

    #[must_use]
    pub fn with_parent(mut self, parent: MeshAddress) -> Self {
        self.parent_address = Some(parent);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn accepts_group_and_virtual_addresses() {
        assert!(Group::new("Kitchen", MeshAddress::new(0xC000)).is_ok());
        assert!(Group::new("Scene", MeshAddress::with_label(0x8F00, Uuid::nil())).is_ok());
    }

    #[test]
    fn rejects_unicast_address() {
        let err = Group::new("Kitchen", MeshAddress::new(0x0001)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidGroupAddress { .. }));
    }

    #[test]
    fn rejects_plain_virtual_range() {
        let err = Group::new("Kitchen", MeshAddress::new(0x8F00)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidGroupAddress { .. }));
    }

    #[test]
    fn rejects_blank_name() {
        let err = Group::new("   ", MeshAddress::new(0xC000)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidGroupName));
    }
}
