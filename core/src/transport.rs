//! Network side of the adapter.
//!
//! `RpcTransport` is the seam between domain operations and the wire:
//! `MaconomyClient` is generic over it so tests can swap in a double.
//! `HttpTransport` is the real implementation on top of `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::RpcConfig;
use crate::envelope::{decode_response, encode_request, RpcEnvelope};
use crate::error::{MaconomyError, Result};
use crate::http::HttpResponse;

/// Executes one envelope and returns the vendor's body when `ok` is truthy.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn execute(&self, envelope: &RpcEnvelope) -> Result<Value>;
}

/// POSTs envelopes to a fixed endpoint.
///
/// Holds no state besides its configuration and connection pool, so one
/// instance can serve any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    config: RpcConfig,
}

impl HttpTransport {
    pub fn new(config: RpcConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("maconomy-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MaconomyError::Config(format!("failed to create HTTP client: {e}")))?;

        tracing::debug!(endpoint = %config.endpoint, "initialized RPC transport");
        Ok(Self { http, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn execute(&self, envelope: &RpcEnvelope) -> Result<Value> {
        let request = encode_request(&self.config.endpoint, envelope, &self.config.options)?;
        let operation = envelope.operation.as_str();
        tracing::debug!(operation, "sending RPC request");

        let mut builder = self.http.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(operation, error = %e, "RPC request failed");
                MaconomyError::Transport(e)
            })?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::trace!(operation, status, body = %body, "RPC response");

        decode_response(HttpResponse { status, body }).map_err(|e| {
            tracing::warn!(operation, status, error = %e, "RPC call rejected");
            e
        })
    }
}
