//! # Error Types Module
//!
//! Centralized error handling for the motion recorder.
//!
//! ## Error Types
//! - `IngestError`: request bodies that cannot be parsed (HTTP 400)
//! - `RecordRejection`: a single sensor record skipped inside a batch
//! - `ExportError`: save requests that were refused or failed to write
//! - `ConfigError`: configuration file I/O and parsing errors
//! - `ServerError`: HTTP server startup and runtime failures
//!
//! Only `IngestError` ever reaches a client. Everything else is reported as
//! status text or a log line; none of these stop the process.

use std::fmt;

/// Errors that fail a whole ingestion request
#[derive(Debug)]
pub enum IngestError {
    /// Body is not JSON, or not an object with a `payload` array
    MalformedPayload(serde_json::Error),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::MalformedPayload(e) => write!(f, "Malformed payload: {}", e),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::MalformedPayload(e) => Some(e),
        }
    }
}

/// Why a single record in a batch was skipped
#[derive(Debug, Clone, PartialEq)]
pub enum RecordRejection {
    /// Record has no `name`, or a name this recorder does not store
    Unrecognized(Option<String>),
    /// Recognized record lacking a required numeric field
    MissingField { name: &'static str, field: &'static str },
}

impl fmt::Display for RecordRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRejection::Unrecognized(Some(name)) => {
                write!(f, "Ignoring unrecognized record '{}'", name)
            }
            RecordRejection::Unrecognized(None) => write!(f, "Ignoring record without a name"),
            RecordRejection::MissingField { name, field } => {
                write!(f, "Record '{}' is missing field '{}'", name, field)
            }
        }
    }
}

impl std::error::Error for RecordRejection {}

/// Reasons a save request did not produce a file
#[derive(Debug)]
pub enum ExportError {
    EmptyParticipantId,
    RecordingStillActive,
    InvalidParticipantId(String),
    InvalidCategory(String),
    Io(std::io::Error),
    Csv(csv::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::EmptyParticipantId => write!(f, "Participant number not entered"),
            ExportError::RecordingStillActive => {
                write!(f, "File not saved: stop recording before saving")
            }
            ExportError::InvalidParticipantId(id) => write!(
                f,
                "File not saved: invalid participant number '{}' (use letters, digits, '_' or '-')",
                id
            ),
            ExportError::InvalidCategory(category) => write!(
                f,
                "File not saved: invalid category '{}' (use letters, digits, '_' or '-')",
                category
            ),
            ExportError::Io(e) => write!(f, "File not saved: {}", e),
            ExportError::Csv(e) => write!(f, "File not saved: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e)
    }
}

/// Errors that can occur during configuration operations
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read config file
    ReadFailed(std::io::Error),
    /// Failed to write config file
    WriteFailed(std::io::Error),
    /// Failed to parse config file
    ParseFailed(toml::de::Error),
    /// Failed to serialize config
    SerializeFailed(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadFailed(e) => {
                write!(f, "Failed to read config file: {}", e)
            }
            ConfigError::WriteFailed(e) => {
                write!(f, "Failed to write config file: {}", e)
            }
            ConfigError::ParseFailed(e) => {
                write!(f, "Failed to parse config file: {}", e)
            }
            ConfigError::SerializeFailed(e) => {
                write!(f, "Failed to serialize config: {}", e)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadFailed(e) => Some(e),
            ConfigError::WriteFailed(e) => Some(e),
            ConfigError::ParseFailed(e) => Some(e),
            ConfigError::SerializeFailed(e) => Some(e),
        }
    }
}

/// Errors from the ingestion server thread
#[derive(Debug)]
pub enum ServerError {
    /// Failed to create Tokio runtime
    RuntimeCreation(String),
    /// Could not bind the listening socket
    Bind { addr: String, source: std::io::Error },
    /// Server stopped with an I/O error
    Serve(std::io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::RuntimeCreation(msg) => {
                write!(f, "Failed to create async runtime: {}", msg)
            }
            ServerError::Bind { addr, source } => {
                write!(f, "Failed to listen on {}: {}", addr, source)
            }
            ServerError::Serve(e) => write!(f, "Ingestion server stopped: {}", e),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::RuntimeCreation(_) => None,
            ServerError::Bind { source, .. } => Some(source),
            ServerError::Serve(e) => Some(e),
        }
    }
}
