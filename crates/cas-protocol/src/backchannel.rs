//! Server-to-server ticket validation call.
//!
//! The backchannel is the only suspension point in the handshake: a single
//! HTTP GET to the CAS server's validation endpoint, bounded by the
//! configured timeout. No retries happen here; retry policy belongs to the
//! host. The response body is captured verbatim because CAS 1.0 answers
//! plain text and CAS 2.0/3.0 answer XML over the same mechanism, with no
//! content-type guarantees.

use cas_core::CasConfig;

use crate::error::{CasError, CasResult};
use crate::response::CasResponse;

/// Largest response body the backchannel will accept.
const MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

/// Issues the backchannel validation call.
pub struct Backchannel {
    client: reqwest::Client,
}

impl Backchannel {
    /// Builds a client honoring the configured timeout.
    pub fn new(config: &CasConfig) -> CasResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.backchannel_timeout)
            .user_agent(concat!("cas-protocol/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CasError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wraps an existing client, keeping whatever policy the host gave it.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Exchanges a service ticket for the raw validation payload.
    ///
    /// `service_uri` must be byte-for-byte the value sent with the login
    /// redirect; the CAS server compares them verbatim.
    pub async fn validate(
        &self,
        config: &CasConfig,
        service_uri: &str,
        ticket: &str,
    ) -> CasResult<CasResponse> {
        let url = validate_url(config, service_uri, ticket);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CasError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "ticket validation call failed");
            return Err(CasError::RemoteStatus(status.as_u16()));
        }
        if response.content_length().is_some_and(|len| len > MAX_RESPONSE_BYTES) {
            return Err(CasError::Transport("response body too large".to_string()));
        }

        let payload = response
            .text()
            .await
            .map_err(|e| CasError::Transport(e.to_string()))?;
        Ok(CasResponse::new(payload))
    }
}

/// Builds the ticket validation URL.
pub fn validate_url(config: &CasConfig, service_uri: &str, ticket: &str) -> String {
    format!(
        "{}{}?service={}&ticket={}",
        config.server,
        config.service_validate_path,
        urlencoding::encode(service_uri),
        urlencoding::encode(ticket)
    )
}
