//! Error types for the friends fetch service and session configuration.
//!
//! # Design
//! Every `FetchError` is terminal for the single fetch that produced it; the
//! service never retries. `HttpStatus` keeps the raw code because it is the
//! one failure a host can act on. `FetchErrorKind` is the payload-free,
//! `Copy` shadow of `FetchError` used in display states and at the C boundary.

use thiserror::Error;

/// Errors returned by the fetch service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The endpoint string is not an absolute URL.
    #[error("invalid endpoint URL `{0}`")]
    InvalidUrl(String),

    /// The transport produced something that is not an HTTP response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The server answered outside the 2xx range.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// The server answered 2xx with an empty body.
    #[error("response body is empty")]
    EmptyData,

    /// The body is not the expected JSON envelope.
    #[error("decoding failed: {0}")]
    Decoding(String),

    /// The request never produced a response (connection, DNS, body read).
    #[error("transport failed: {0}")]
    Transport(String),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::InvalidUrl(_) => FetchErrorKind::InvalidUrl,
            FetchError::InvalidResponse(_) => FetchErrorKind::InvalidResponse,
            FetchError::HttpStatus(status) => FetchErrorKind::HttpStatus(*status),
            FetchError::EmptyData => FetchErrorKind::EmptyData,
            FetchError::Decoding(_) => FetchErrorKind::Decoding,
            FetchError::Transport(_) => FetchErrorKind::Transport,
        }
    }
}

/// Category of a `FetchError` without its diagnostic payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    InvalidUrl,
    InvalidResponse,
    HttpStatus(u16),
    EmptyData,
    Decoding,
    Transport,
}

/// Errors raised while reading a session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed session config: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("endpoint `{name}` is not a valid URL: {value}")]
    InvalidEndpoint { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_keeps_http_status_code() {
        assert_eq!(FetchError::HttpStatus(503).kind(), FetchErrorKind::HttpStatus(503));
    }

    #[test]
    fn kind_drops_payloads() {
        assert_eq!(
            FetchError::Decoding("missing field `response`".to_string()).kind(),
            FetchErrorKind::Decoding
        );
        assert_eq!(
            FetchError::Transport("connection refused".to_string()).kind(),
            FetchErrorKind::Transport
        );
    }

    #[test]
    fn display_includes_status() {
        assert_eq!(FetchError::HttpStatus(500).to_string(), "HTTP status 500");
        assert_eq!(FetchError::EmptyData.to_string(), "response body is empty");
    }
}
