// ── Typed argument records for Command payloads ──
//
// Each command that carries a payload decodes the host's untyped
// argument map into one of these records. Decoding is all-or-nothing:
// a record is produced only when every field is present and well-typed.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::Method;
use crate::model::Address;

/// The host sent arguments a command cannot use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed arguments for '{method}': {reason}")]
pub struct ArgumentError {
    pub method: Method,
    pub reason: String,
}

impl ArgumentError {
    pub fn new(method: Method, reason: impl Into<String>) -> Self {
        Self {
            method,
            reason: reason.into(),
        }
    }
}

/// Decoding from an optional untyped argument map.
pub trait DecodeArguments: DeserializeOwned {
    /// Method whose payload this record is.
    const METHOD: Method;

    /// Field-level checks beyond what the types already guarantee.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    fn decode(arguments: Option<&Value>) -> Result<Self, ArgumentError> {
        let Some(value) = arguments else {
            return Err(ArgumentError::new(Self::METHOD, "arguments are missing"));
        };
        if !value.is_object() {
            return Err(ArgumentError::new(
                Self::METHOD,
                "arguments must be a key-value map",
            ));
        }

        let record =
            Self::deserialize(value).map_err(|e| ArgumentError::new(Self::METHOD, e.to_string()))?;
        record
            .validate()
            .map_err(|reason| ArgumentError::new(Self::METHOD, reason))?;
        Ok(record)
    }
}

// ── Groups ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddGroupWithNameArguments {
    pub name: String,
}

impl DecodeArguments for AddGroupWithNameArguments {
    const METHOD: Method = Method::AddGroupWithName;

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("field `name` must not be empty".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveGroupArguments {
    pub group_address: Address,
}

impl DecodeArguments for RemoveGroupArguments {
    const METHOD: Method = Method::RemoveGroup;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GetElementsForGroupArguments {
    pub address: Address,
}

impl DecodeArguments for GetElementsForGroupArguments {
    const METHOD: Method = Method::GetElementsForGroup;
}
