// ── Response encoding ──
//
// Turns adapter outcomes into the reply shapes the host contract fixes
// per method. Encoding is total: every outcome, including the degraded
// "not found" and "no provisioner" cases, yields a reply, and absent
// values are written as explicit `null`/`false` rather than omitted.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::command::{CommandResult, Method};
use crate::error::{CoreError, ErrorKind};
use crate::model::{ElementSummary, Group, ModelSummary, uuid_string};

/// What the host receives back for one call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "body", rename_all = "camelCase")]
pub enum Reply {
    Success(Value),
    Error { code: String, message: String },
    /// Void acknowledgement for methods the bridge does not implement.
    NotImplemented,
}

impl Reply {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Error {
            code: kind.code().to_owned(),
            message: message.into(),
        }
    }

    pub fn from_error(err: &CoreError) -> Self {
        Self::error(err.kind(), err.to_string())
    }

    /// Success body, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Success(value) => Some(value),
            Self::Error { .. } | Self::NotImplemented => None,
        }
    }
}

// ── Payload shapes ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPayload {
    pub name: String,
    pub address: u16,
    pub address_label: Option<String>,
    pub parent_address: Option<u16>,
    pub parent_address_label: Option<String>,
}

impl From<&Group> for GroupPayload {
    fn from(group: &Group) -> Self {
        Self {
            name: group.name.clone(),
            address: group.address.address,
            address_label: group.address.label_string(),
            parent_address: group.parent_address.map(|p| p.address),
            parent_address_label: group.parent_address.and_then(|p| p.label_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddGroupPayload {
    pub group: Option<GroupPayload>,
    pub successfully_added: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodePayload {
    pub uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPayload {
    pub name: Option<String>,
    pub address: u16,
    pub location_descriptor: u16,
    pub models: Vec<ModelPayload>,
}

impl From<&ElementSummary> for ElementPayload {
    fn from(element: &ElementSummary) -> Self {
        Self {
            name: element.name.clone(),
            address: element.address,
            location_descriptor: element.location,
            models: element.models.iter().map(ModelPayload::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPayload {
    pub subscribed_addresses: Vec<u16>,
    pub bound_app_key: Vec<u16>,
}

impl From<&ModelSummary> for ModelPayload {
    fn from(model: &ModelSummary) -> Self {
        Self {
            subscribed_addresses: model.subscriptions.clone(),
            bound_app_key: model.bound_application_keys.clone(),
        }
    }
}

// ── Encoder ────────────────────────────────────────────────────────

/// Encode the outcome of executing the command for `method`.
///
/// `method` is `None` only for unrecognized calls.
pub fn encode(method: Option<Method>, result: Result<CommandResult, CoreError>) -> Reply {
    match result {
        Ok(outcome) => encode_success(outcome),
        Err(CoreError::UnrecognizedCommand { .. }) => Reply::NotImplemented,
        Err(CoreError::MalformedArguments(err)) => {
            Reply::error(ErrorKind::MalformedArguments, err.to_string())
        }
        Err(err) => encode_degraded(method, &err),
    }
}

fn encode_success(outcome: CommandResult) -> Reply {
    match outcome {
        CommandResult::Id(id) => Reply::Success(Value::String(id)),
        CommandResult::MeshName(name) => Reply::Success(name.map_or(Value::Null, Value::String)),
        CommandResult::HighestAllocatableAddress(address) => Reply::Success(Value::from(address)),
        CommandResult::Nodes(uuids) => {
            let nodes: Vec<NodePayload> = uuids
                .iter()
                .map(|uuid| NodePayload {
                    uuid: uuid_string(uuid),
                })
                .collect();
            payload(&nodes)
        }
        CommandResult::SelectedProvisioner(uuid) => Reply::Success(
            uuid.as_ref()
                .map_or(Value::Null, |u| Value::String(uuid_string(u))),
        ),
        CommandResult::GroupAdded(group) => payload(&AddGroupPayload {
            group: Some(GroupPayload::from(&group)),
            successfully_added: true,
        }),
        CommandResult::Groups(groups) => {
            let groups: Vec<GroupPayload> = groups.iter().map(GroupPayload::from).collect();
            payload(&groups)
        }
        CommandResult::GroupRemoved(_) => Reply::Success(Value::Bool(true)),
        CommandResult::ElementsForGroup(elements) => {
            let elements: Vec<ElementPayload> = elements.iter().map(ElementPayload::from).collect();
            payload(&elements)
        }
    }
}

/// Domain failures degrade to the per-method "false" shape.
fn encode_degraded(method: Option<Method>, err: &CoreError) -> Reply {
    match method {
        Some(Method::AddGroupWithName) => payload(&AddGroupPayload {
            group: None,
            successfully_added: false,
        }),
        Some(Method::RemoveGroup | Method::GetElementsForGroup) => {
            Reply::Success(Value::Bool(false))
        }
        _ => Reply::from_error(err),
    }
}

fn payload<T: Serialize>(value: &T) -> Reply {
    match serde_json::to_value(value) {
        Ok(value) => Reply::Success(value),
        Err(e) => {
            warn!(error = %e, "reply payload failed to serialize");
            Reply::error(ErrorKind::Internal, e.to_string())
        }
    }
}
