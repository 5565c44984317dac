//! Error types for the Maconomy RPC client.
//!
//! # Design
//! The three failure kinds of a round-trip get their own variants so callers
//! can tell them apart without string matching: `Transport` (the HTTP call
//! never completed), `Decode` (the body was not JSON) and `Rpc` (the vendor
//! answered with a falsy `ok`). The remaining variants are raised before any
//! request leaves the process.

use serde_json::Value;
use thiserror::Error;

/// Errors returned by the transport, the mapper and `MaconomyClient`.
#[derive(Error, Debug)]
pub enum MaconomyError {
    /// The HTTP call could not be completed (connection refused, DNS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON. `body` is the raw text as received.
    #[error("could not parse JSON: {body}. {source}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The vendor answered with a falsy `ok` flag.
    ///
    /// `message` is taken from `Message` or `message`; `response` is the whole
    /// parsed body for callers that want the structured detail.
    #[error("Maconomy error: {message}")]
    Rpc { message: String, response: Value },

    /// The request envelope could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// An operation other than login was attempted without a session id.
    #[error("session id is missing, login first")]
    MissingSession,

    /// A required request argument was empty.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A date string matched none of the accepted formats.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// The client configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl MaconomyError {
    pub fn is_transport(&self) -> bool {
        matches!(self, MaconomyError::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, MaconomyError::Decode { .. })
    }

    pub fn is_rpc(&self) -> bool {
        matches!(self, MaconomyError::Rpc { .. })
    }

    /// The message reported by the vendor, for `Rpc` errors only.
    pub fn vendor_message(&self) -> Option<&str> {
        match self {
            MaconomyError::Rpc { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MaconomyError>;
