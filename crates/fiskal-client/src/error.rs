//! # Client Error Types
//!
//! Error types for the example client layer.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Document     │  │       Service           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Core (wraps    │  │  Service                │ │
//! │  │  InvalidUrl     │  │  CoreError)     │  │  EchoMismatch           │ │
//! │  │  ConfigLoad/Save│  │  InvalidJournal │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │    Session      │                                                    │
//! │  │  InvalidChoice  │                                                    │
//! │  │  UnknownExample │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use fiskal_core::{CoreError, ValidationError};

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Invalid service endpoint.
    #[error("Invalid endpoint: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Document Errors
    // =========================================================================
    /// A receipt document could not be transformed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Journal chunks did not assemble into JSON.
    #[error("Invalid journal payload: {0}")]
    InvalidJournal(String),

    // =========================================================================
    // Service Errors
    // =========================================================================
    /// The PosService implementation reported a failure.
    #[error("Service call {call} failed: {message}")]
    Service { call: &'static str, message: String },

    /// Echo came back with a different message.
    #[error("Echo mismatch: sent '{sent}', received '{received}'")]
    EchoMismatch { sent: String, received: String },

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// Menu input is neither `exit` nor a listed number.
    #[error("The given input is not supported: '{0}'")]
    InvalidChoice(String),

    /// Example index out of range (1-based).
    #[error("No example #{index}; {available} loaded")]
    UnknownExample { index: usize, available: usize },
}

impl ClientError {
    /// Shorthand for a `Service` error.
    pub fn service(call: &'static str, message: impl Into<String>) -> Self {
        ClientError::Service {
            call,
            message: message.into(),
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::InvalidConfig(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::EchoMismatch {
            sent: "Hello World!".to_string(),
            received: "Hello".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Echo mismatch: sent 'Hello World!', received 'Hello'"
        );

        let err = ClientError::service("Sign", "unavailable");
        assert_eq!(err.to_string(), "Service call Sign failed: unavailable");
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: ClientError = CoreError::malformed("cbPayItems", "required array is missing").into();
        assert_eq!(
            err.to_string(),
            "Malformed receipt document at cbPayItems: required array is missing"
        );
    }
}
