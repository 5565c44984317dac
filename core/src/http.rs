//! HTTP request and response described as plain data.
//!
//! # Design
//! Encoding an envelope into an `HttpRequest` and classifying an
//! `HttpResponse` are pure functions (see `envelope`). Only `HttpTransport`
//! touches the network, so the wire format can be tested byte for byte
//! without a server. The vendor exposes a single POST endpoint, so there is
//! no method field.

/// Content type of every request sent to the RPC endpoint.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A POST request to the RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Form-encoded body.
    pub body: String,
}

/// A response as read off the wire. The body is kept as text so a non-JSON
/// reply can be reported verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}
