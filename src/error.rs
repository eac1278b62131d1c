//! Error types for the query transport.

use std::fmt;

/// Errors produced by client construction and query execution.
#[derive(Debug, Clone)]
pub enum ClientError {
    /// No endpoint URL was configured.
    MissingEndpoint,
    /// The endpoint URL could not be parsed.
    InvalidUrl(String),
    /// Request timed out.
    Timeout,
    /// Connection refused or failed.
    Connection(String),
    /// Transport-level request failure.
    Transport(String),
    /// Request or response body could not be encoded/decoded as JSON.
    Decode(String),
    /// A hook or listener failed.
    Callback(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEndpoint => write!(f, "Missing endpoint URL"),
            Self::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
            Self::Timeout => write!(f, "Request timed out"),
            Self::Connection(msg) => write!(f, "Connection error: {msg}"),
            Self::Transport(msg) => write!(f, "Transport error: {msg}"),
            Self::Decode(msg) => write!(f, "Decode error: {msg}"),
            Self::Callback(msg) => write!(f, "Callback error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// A specialized Result type for query operations.
pub type Result<T> = std::result::Result<T, ClientError>;
