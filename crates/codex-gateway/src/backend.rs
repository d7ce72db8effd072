//! Upstream reflection proxy.
//!
//! [`UpstreamReflector`] forwards the caller's JSON body to the master
//! core's reflection endpoint and relays the JSON answer. The body is not
//! parsed into a typed request, so fields the master core adds later pass
//! through without gateway changes.

use crate::error::{GatewayError, GatewayResult};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// JSON answer from the upstream, with its status code.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Value,
}

/// Proxies reflection requests to a single upstream URL.
pub struct UpstreamReflector {
    url: String,
    client: Client,
}

impl UpstreamReflector {
    /// Create a proxy for `url` with a per-request `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// POST `payload` to the upstream and return its JSON reply.
    #[instrument(skip(self, payload), fields(upstream = %self.url))]
    pub async fn forward(&self, payload: &Value) -> GatewayResult<UpstreamReply> {
        debug!("forwarding reflection to upstream");
        let start = std::time::Instant::now();

        let resp = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::Upstream(format!("invalid upstream body: {e}")))?;

        debug!(
            status,
            latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "upstream replied"
        );
        Ok(UpstreamReply { status, body })
    }
}
