// ── Command API ──
//
// Every host call is parsed exactly once into a `Command`. The parser is
// total over the method name: unknown names become `Unrecognized` and
// argument decode failures become `Malformed`, so nothing the host sends
// is silently dropped and nothing untyped reaches the domain adapter.

pub mod requests;

use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::model::{Address, Group};

pub use requests::{
    AddGroupWithNameArguments, ArgumentError, DecodeArguments, GetElementsForGroupArguments,
    RemoveGroupArguments,
};

/// Method names the host may call, in their wire spelling.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum Method {
    GetId,
    GetMeshNetworkName,
    HighestAllocatableAddress,
    Nodes,
    SelectedProvisionerUuid,
    AddGroupWithName,
    Groups,
    RemoveGroup,
    GetElementsForGroup,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// One typed unit of host-requested work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GetId,
    GetMeshNetworkName,
    HighestAllocatableAddress,
    ListNodes,
    SelectedProvisionerId,
    AddGroup(AddGroupWithNameArguments),
    ListGroups,
    RemoveGroup(RemoveGroupArguments),
    GetElementsForGroup(GetElementsForGroupArguments),
    /// The method name is not one the bridge knows.
    Unrecognized(String),
    /// The method is known but its arguments did not decode.
    Malformed(ArgumentError),
}

impl Command {
    /// Translate a raw host call into a command. Never fails.
    pub fn parse(method: &str, arguments: Option<&Value>) -> Self {
        let Ok(known) = method.parse::<Method>() else {
            return Self::Unrecognized(method.to_owned());
        };

        let decoded = match known {
            Method::GetId => Ok(Self::GetId),
            Method::GetMeshNetworkName => Ok(Self::GetMeshNetworkName),
            Method::HighestAllocatableAddress => Ok(Self::HighestAllocatableAddress),
            Method::Nodes => Ok(Self::ListNodes),
            Method::SelectedProvisionerUuid => Ok(Self::SelectedProvisionerId),
            Method::AddGroupWithName => {
                AddGroupWithNameArguments::decode(arguments).map(Self::AddGroup)
            }
            Method::Groups => Ok(Self::ListGroups),
            Method::RemoveGroup => RemoveGroupArguments::decode(arguments).map(Self::RemoveGroup),
            Method::GetElementsForGroup => {
                GetElementsForGroupArguments::decode(arguments).map(Self::GetElementsForGroup)
            }
        };

        decoded.unwrap_or_else(Self::Malformed)
    }

    /// The method this command answers, if it was recognized.
    pub fn method(&self) -> Option<Method> {
        match self {
            Self::GetId => Some(Method::GetId),
            Self::GetMeshNetworkName => Some(Method::GetMeshNetworkName),
            Self::HighestAllocatableAddress => Some(Method::HighestAllocatableAddress),
            Self::ListNodes => Some(Method::Nodes),
            Self::SelectedProvisionerId => Some(Method::SelectedProvisionerUuid),
            Self::AddGroup(_) => Some(Method::AddGroupWithName),
            Self::ListGroups => Some(Method::Groups),
            Self::RemoveGroup(_) => Some(Method::RemoveGroup),
            Self::GetElementsForGroup(_) => Some(Method::GetElementsForGroup),
            Self::Malformed(err) => Some(err.method),
            Self::Unrecognized(_) => None,
        }
    }

    /// Whether executing this command may change the network.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::AddGroup(_) | Self::RemoveGroup(_))
    }
}

/// Typed outcome of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Id(String),
    MeshName(Option<String>),
    HighestAllocatableAddress(Address),
    Nodes(Vec<uuid::Uuid>),
    SelectedProvisioner(Option<uuid::Uuid>),
    GroupAdded(Group),
    Groups(Vec<Group>),
    GroupRemoved(Group),
    ElementsForGroup(Vec<crate::model::ElementSummary>),
}
