//! Explicit configuration for one RPC endpoint.
//!
//! Nothing here is process-wide: each `HttpTransport` owns its own
//! `RpcConfig`, so adapters for different endpoints can coexist.

use serde::{Deserialize, Serialize};

use crate::error::{MaconomyError, Result};

/// Locale and display flags sent with every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonOptions {
    #[serde(default)]
    pub clean: bool,
    #[serde(default)]
    pub calfocus: bool,
    #[serde(default)]
    pub impersonate: bool,
    #[serde(default = "default_charset")]
    pub maccharset: String,
    #[serde(default = "default_locale")]
    pub lang: String,
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_charset() -> String {
    "UTF-8".to_string()
}

fn default_locale() -> String {
    "en_US".to_string()
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            clean: false,
            calfocus: false,
            impersonate: false,
            maccharset: default_charset(),
            lang: default_locale(),
            locale: default_locale(),
        }
    }
}

/// Endpoint, timeout and flags for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Full URL of the vendor's RPC endpoint.
    #[serde(default)]
    pub endpoint: String,

    /// Overall deadline for one round-trip.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(default)]
    pub options: CommonOptions,
}

fn default_timeout_seconds() -> u64 {
    30
}

impl RpcConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_seconds: default_timeout_seconds(),
            options: CommonOptions::default(),
        }
    }

    /// Reject an empty or non-http(s) endpoint and a zero timeout.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(MaconomyError::Config("endpoint is not set".to_string()));
        }
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| MaconomyError::Config(format!("invalid endpoint {}: {e}", self.endpoint)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(MaconomyError::Config(format!(
                "endpoint must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(MaconomyError::Config(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
