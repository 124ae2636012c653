//! Error types and handling for maxbridge
//!
//! This module defines the error types used throughout the bridge. Transport
//! and parse failures are absorbed by the polling handlers; the variants exist
//! so that every layer below them can report precisely what went wrong.

use thiserror::Error;

/// Result type alias for maxbridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Main error type for maxbridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Serialization/deserialization errors (config files)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Connection refused, DNS failure and other transport problems
    #[error("Transport error: GET {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The fetch did not complete within the fixed timeout
    #[error("Timeout error: GET {url} timed out: {message}")]
    Timeout { url: String, message: String },

    /// The gateway answered with a non-success status
    #[error("HTTP status error: GET {url} returned {status}")]
    Status { url: String, status: u16 },

    /// Malformed JSON or an unexpected document shape
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Requested device or entity does not exist
    #[error("Not found: {target}")]
    NotFound { target: String },

    /// Command issuance failure
    #[error("Command error: {message}")]
    Command { message: String },

    /// Generic errors with context
    #[error("Error: {message}")]
    Generic { message: String },
}

impl BridgeError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        BridgeError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        BridgeError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        BridgeError::Io {
            message: message.into(),
        }
    }

    /// Create a new transport error for `url`
    pub fn transport<U: Into<String>, S: Into<String>>(url: U, message: S) -> Self {
        BridgeError::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error for `url`
    pub fn timeout<U: Into<String>, S: Into<String>>(url: U, message: S) -> Self {
        BridgeError::Timeout {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new HTTP status error
    pub fn status<U: Into<String>>(url: U, status: u16) -> Self {
        BridgeError::Status {
            url: url.into(),
            status,
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        BridgeError::Parse {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(target: S) -> Self {
        BridgeError::NotFound {
            target: target.into(),
        }
    }

    /// Create a new command error
    pub fn command<S: Into<String>>(message: S) -> Self {
        BridgeError::Command {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        BridgeError::Generic {
            message: message.into(),
        }
    }

    /// True for failures that happened on the wire rather than in the payload
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            BridgeError::Transport { .. } | BridgeError::Timeout { .. } | BridgeError::Status { .. }
        )
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for BridgeError {
    fn from(err: serde_yaml::Error) -> Self {
        BridgeError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::parse(err.to_string())
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        if err.is_timeout() {
            BridgeError::timeout(url, err.to_string())
        } else if let Some(status) = err.status() {
            BridgeError::status(url, status.as_u16())
        } else {
            BridgeError::transport(url, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = BridgeError::config("test config error");
        assert!(matches!(err, BridgeError::Config { .. }));

        let err = BridgeError::transport("http://cube/", "refused");
        assert!(matches!(err, BridgeError::Transport { .. }));

        let err = BridgeError::validation("field", "test validation error");
        assert!(matches!(err, BridgeError::Validation { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = BridgeError::config("test error");
        assert_eq!(format!("{}", err), "Configuration error: test error");

        let err = BridgeError::timeout("http://h:8080/get-duty?cube=0a", "deadline");
        assert_eq!(
            format!("{}", err),
            "Timeout error: GET http://h:8080/get-duty?cube=0a timed out: deadline"
        );
    }

    #[test]
    fn transport_classification() {
        assert!(BridgeError::transport("u", "x").is_transport());
        assert!(BridgeError::timeout("u", "x").is_transport());
        assert!(BridgeError::status("u", 500).is_transport());
        assert!(!BridgeError::parse("x").is_transport());
        assert!(!BridgeError::not_found("0A0B0C").is_transport());
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let err: BridgeError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, BridgeError::Parse { .. }));
    }
}
