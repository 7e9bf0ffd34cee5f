//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use meshgate_config::ConfigError;
use meshgate_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const INVALID_NETWORK: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Networks ─────────────────────────────────────────────────────
    #[error("No network document given")]
    #[diagnostic(
        code(meshgate::no_network),
        help(
            "Pass one with --network <FILE>, or set `network` in {path}\n\
             or MESHGATE_NETWORK in the environment."
        )
    )]
    NoNetwork { path: String },

    #[error("Could not read network document {path}")]
    #[diagnostic(code(meshgate::network_io))]
    NetworkIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Network document {path} is invalid: {message}")]
    #[diagnostic(
        code(meshgate::invalid_network),
        help("Group addresses must be unique and lie in the group or virtual range.")
    )]
    InvalidNetwork { path: String, message: String },

    #[error("Network '{network_id}' is not loaded")]
    #[diagnostic(
        code(meshgate::unknown_network),
        help("Run: meshgate channels --network <FILE> to see loaded network ids")
    )]
    UnknownNetwork { network_id: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(meshgate::config))]
    Config(#[from] ConfigError),

    #[error("Method call failed: {message}")]
    #[diagnostic(code(meshgate::call))]
    Call { code: String, message: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(meshgate::json), help("Check the JSON text and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoNetwork { .. } | Self::Json(_) => exit_code::USAGE,
            Self::UnknownNetwork { .. } | Self::NetworkIo { .. } => exit_code::NOT_FOUND,
            Self::InvalidNetwork { .. } => exit_code::INVALID_NETWORK,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownNetwork { network_id } => Self::UnknownNetwork { network_id },
            CoreError::InvalidNetwork { message } => Self::InvalidNetwork {
                path: "(document)".into(),
                message,
            },
            other => Self::Call {
                code: other.kind().code().to_owned(),
                message: other.to_string(),
            },
        }
    }
}
