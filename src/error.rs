//! Error types for resource-pager
//!
//! Every public API returns `Result<T, Error>`. The variants separate three
//! classes callers need to tell apart: a misconfigured call detected locally
//! (`InvalidArgument`), a request the service rejected (`Fault`), and a
//! success response the client could not understand (`MalformedResponse`).

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The main error type for resource-pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Client-side Errors
    // ============================================================================
    #[error("Invalid argument '{parameter}': {message}")]
    InvalidArgument { parameter: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to serialize request body: {0}")]
    Serialize(serde_json::Error),

    // ============================================================================
    // Service Errors
    // ============================================================================
    #[error("HTTP {status}: {body}")]
    Fault { status: u16, body: FaultBody },

    #[error("Malformed response (HTTP {status}): {message}")]
    MalformedResponse { status: u16, message: String },

    #[error("Long-running operation ended in state '{state}'")]
    OperationFailed { state: String, body: Option<Value> },

    #[error("Long-running operation still in progress after {attempts} polls")]
    PollingExhausted { attempts: u32 },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Body carried by a [`Error::Fault`]
///
/// Holds the decoded JSON error payload when the body parses, otherwise the
/// raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum FaultBody {
    Json(Value),
    Raw(String),
}

impl FaultBody {
    /// Decode a fault body from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Raw(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// The JSON payload, if the body decoded
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Extract the ARM error envelope `{"error": {"code", "message"}}`
    pub fn cloud_error(&self) -> Option<CloudError> {
        let error = self.as_json()?.get("error")?;
        CloudError::deserialize(error).ok()
    }
}

impl fmt::Display for FaultBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value}"),
            Self::Raw(text) => f.write_str(text),
        }
    }
}

/// Service error details as returned inside the `error` envelope
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CloudError {
    pub code: Option<String>,
    pub message: Option<String>,
    pub target: Option<String>,
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a missing required parameter error
    pub fn required(parameter: impl Into<String>) -> Self {
        Self::invalid_argument(parameter, "is required and cannot be empty")
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a fault from a status and raw body
    pub fn fault(status: u16, body: &[u8]) -> Self {
        Self::Fault {
            status,
            body: FaultBody::from_bytes(body),
        }
    }

    /// Create a malformed response error
    pub fn malformed(status: u16, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            status,
            message: message.into(),
        }
    }

    /// True for errors detected before any network I/O
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument { .. }
                | Error::Config { .. }
                | Error::YamlParse(_)
                | Error::Serialize(_)
        )
    }

    /// True when the service rejected the request
    pub fn is_fault(&self) -> bool {
        matches!(self, Error::Fault { .. })
    }

    /// HTTP status associated with this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Fault { status, .. } | Error::MalformedResponse { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for resource-pager
pub type Result<T> = std::result::Result<T, Error>;
