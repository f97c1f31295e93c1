//! Error types for lamina
//!
//! All modules use `LaminaResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for lamina operations
pub type LaminaResult<T> = Result<T, LaminaError>;

/// All errors that can occur in lamina
#[derive(Error, Debug)]
pub enum LaminaError {
    // Layer store errors
    #[error("Layer already exists: {0}")]
    AlreadyExists(String),

    #[error("Parent layer has no manifest: {0}")]
    ParentMissing(String),

    #[error("Layer not found: {0}")]
    NotFound(String),

    #[error("Deletion of {0} aborted by user")]
    UserAborted(String),

    #[error("Deletion of {parent} halted: child {child} was not deleted")]
    ChildDeletionAborted { parent: String, child: String },

    // Mount errors
    #[error("Failed to mount layer {name}: {reason}")]
    MountFailure { name: String, reason: String },

    #[error("Failed to unmount layer {name}: {reason}")]
    UnmountFailure { name: String, reason: String },

    #[error("This operation requires root privileges")]
    RootRequired,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // General errors
    #[error("{0}")]
    User(String),
}

impl LaminaError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::RootRequired => Some("Re-run with: sudo lamina ..."),
            Self::ParentMissing(_) => Some("Create the parent first: lamina create <parent>"),
            Self::MountFailure { .. } => {
                Some("Check that the aufs module is loaded: modprobe aufs")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = LaminaError::NotFound("base".to_string());
        assert!(err.to_string().contains("base"));
    }

    #[test]
    fn error_hint() {
        let err = LaminaError::RootRequired;
        assert_eq!(err.hint(), Some("Re-run with: sudo lamina ..."));
        assert!(LaminaError::AlreadyExists("x".into()).hint().is_none());
    }

    #[test]
    fn child_abort_names_both_layers() {
        let err = LaminaError::ChildDeletionAborted {
            parent: "base".to_string(),
            child: "app".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("base"));
        assert!(msg.contains("app"));
    }
}
