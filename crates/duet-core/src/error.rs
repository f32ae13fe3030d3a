//! Error types for the Duet application.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifies which remote collaborator an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// The session-based conversational agent service.
    Agent,
    /// The single-shot completion API.
    Llm,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Agent => write!(f, "agent backend"),
            Backend::Llm => write!(f, "LLM backend"),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(", HTTP {s}")).unwrap_or_default()
}

/// A shared error type for the entire Duet application.
///
/// A reply timeout is not represented here; the reply awaiter reports it
/// as an outcome.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum DuetError {
    /// The backend could not be reached at all.
    #[error("Connection error ({backend}): {message}")]
    Connection { backend: Backend, message: String },

    /// The backend was reachable but rejected or failed the call.
    #[error("Remote call error ({backend}{}): {message}", status_suffix(.status))]
    RemoteCall {
        backend: Backend,
        status: Option<u16>,
        message: String,
    },

    /// The agent identity could not be resolved at bootstrap.
    #[error("Not initialized: {0}")]
    NotInitialized(String),

    /// Caller supplied input that cannot be processed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// The caller abandoned the operation.
    #[error("Operation cancelled")]
    Cancelled,
}

impl DuetError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Connection error
    pub fn connection(backend: Backend, message: impl Into<String>) -> Self {
        Self::Connection {
            backend,
            message: message.into(),
        }
    }

    /// Creates a RemoteCall error
    pub fn remote_call(backend: Backend, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RemoteCall {
            backend,
            status,
            message: message.into(),
        }
    }

    /// Creates a NotInitialized error
    pub fn not_initialized(message: impl Into<String>) -> Self {
        Self::NotInitialized(message.into())
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Returns the backend this error is attributed to, if any.
    pub fn backend(&self) -> Option<Backend> {
        match self {
            Self::Connection { backend, .. } | Self::RemoteCall { backend, .. } => Some(*backend),
            _ => None,
        }
    }

    /// Check if this is a transport-level failure
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Check if this is a rejected remote call
    pub fn is_remote_call(&self) -> bool {
        matches!(self, Self::RemoteCall { .. })
    }

    /// Check if the bootstrap identity is missing
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Self::NotInitialized(_))
    }

    /// Check if this is an input validation error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if the operation was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DuetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DuetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DuetError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DuetError>`.
pub type Result<T> = std::result::Result<T, DuetError>;
