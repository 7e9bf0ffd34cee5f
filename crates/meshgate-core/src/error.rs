// ── Core error types ──
//
// Every failure the dispatch path can hit. None of these are fatal: the
// reply encoder turns each one into an explicit reply, degrading domain
// failures to `false`/`null` payloads where the host contract asks for it.

use strum::{Display, IntoStaticStr};
use thiserror::Error;
use uuid::Uuid;

use crate::command::ArgumentError;
use crate::model::MeshAddress;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Dispatch errors ──────────────────────────────────────────────
    #[error("Method not implemented: {method}")]
    UnrecognizedCommand { method: String },

    #[error(transparent)]
    MalformedArguments(#[from] ArgumentError),

    // ── Precondition errors ──────────────────────────────────────────
    #[error("Network {network_id} has no local provisioner")]
    NoLocalProvisioner { network_id: String },

    #[error("No group address left in the ranges of provisioner {provisioner}")]
    NoGroupAddressAvailable { provisioner: Uuid },

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Group not found: {address}")]
    GroupNotFound { address: MeshAddress },

    #[error("Unknown mesh network: {network_id}")]
    UnknownNetwork { network_id: String },

    // ── Domain rejections ────────────────────────────────────────────
    #[error("A group already exists at {address}")]
    GroupAlreadyExists { address: MeshAddress },

    #[error("Group {address} is still referenced by a model or a child group")]
    GroupInUse { address: MeshAddress },

    #[error("Address {address} cannot identify a group")]
    InvalidGroupAddress { address: MeshAddress },

    #[error("Group name must not be empty")]
    InvalidGroupName,

    #[error("Invalid network document: {message}")]
    InvalidNetwork { message: String },
}

/// Coarse classification of a [`CoreError`], also used as the reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    UnrecognizedCommand,
    MalformedArguments,
    PreconditionFailed,
    NotFound,
    DomainRejected,
    Internal,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        self.into()
    }
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnrecognizedCommand { .. } => ErrorKind::UnrecognizedCommand,
            Self::MalformedArguments(_) => ErrorKind::MalformedArguments,
            Self::NoLocalProvisioner { .. } | Self::NoGroupAddressAvailable { .. } => {
                ErrorKind::PreconditionFailed
            }
            Self::GroupNotFound { .. } | Self::UnknownNetwork { .. } => ErrorKind::NotFound,
            Self::GroupAlreadyExists { .. }
            | Self::GroupInUse { .. }
            | Self::InvalidGroupAddress { .. }
            | Self::InvalidGroupName
            | Self::InvalidNetwork { .. } => ErrorKind::DomainRejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_render_as_reply_codes() {
        assert_eq!(ErrorKind::MalformedArguments.code(), "MALFORMED_ARGUMENTS");
        assert_eq!(ErrorKind::PreconditionFailed.to_string(), "PRECONDITION_FAILED");
        assert_eq!(ErrorKind::NotFound.code(), "NOT_FOUND");
    }

    #[test]
    fn errors_classify() {
        let missing = CoreError::GroupNotFound {
            address: MeshAddress::new(0xC000),
        };
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(missing.to_string(), "Group not found: 0xC000");

        let no_provisioner = CoreError::NoLocalProvisioner {
            network_id: "n".into(),
        };
        assert_eq!(no_provisioner.kind(), ErrorKind::PreconditionFailed);
        assert_eq!(CoreError::InvalidGroupName.kind(), ErrorKind::DomainRejected);
    }
}
