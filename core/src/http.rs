//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The fetch service builds
//! `HttpRequest` values and parses `HttpResponse` values; whoever executes the
//! round-trip (the bundled `UreqTransport`, or a native host through the C
//! ABI) sits in between. Every request this crate builds is a `GET`, so there
//! is no method field.
//!
//! All fields use owned types so values can cross the FFI boundary without
//! lifetime concerns.

/// An HTTP `GET` request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the caller after executing an `HttpRequest`, then handed
/// back to `FriendsClient::parse_*` or `FriendsSession::complete_load`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A response with no headers, the shape most hosts and tests produce.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}
