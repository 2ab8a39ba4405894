use serde_json::Value;
use thiserror::Error;

/// Failure of a single HTTP exchange with the company backend.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// The one error kind surfaced by store operations.
///
/// Carries the domain and operation that failed, the parameters the
/// operation was called with, and the transport failure that caused it.
/// Callers that need to tell "not found" from "network down" inspect
/// [`ServerError::status`] or the source.
#[derive(Error, Debug)]
#[error("{domain}.{operation} failed: {source}")]
pub struct ServerError {
    pub domain: &'static str,
    pub operation: &'static str,
    pub params: Value,
    #[source]
    pub source: TransportError,
}

impl ServerError {
    pub fn new(
        domain: &'static str,
        operation: &'static str,
        source: TransportError,
        params: Value,
    ) -> Self {
        Self {
            domain,
            operation,
            params,
            source,
        }
    }

    pub fn cause(&self) -> &TransportError {
        &self.source
    }

    pub fn status(&self) -> Option<u16> {
        self.source.status()
    }
}

/// Why a loosely-typed JSON value could not be read as the wanted type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoerceError {
    #[error("value is missing")]
    Missing,

    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot read {value:?} as {expected}")]
    Unparseable {
        expected: &'static str,
        value: String,
    },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Result of a store operation.
pub type StoreResult<T> = std::result::Result<T, ServerError>;
