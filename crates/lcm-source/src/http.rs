//! HTTP gateway configuration API client
//!
//! `GET {server}/api/gateways/{gateway_id}/configuration` returns the
//! channel plan as JSON:
//!
//! ```json
//! {
//!   "updatedAt": "2017-05-01T12:00:00Z",
//!   "channels": [
//!     {"modulation": "LORA", "frequency": 868100000, "bandwidth": 125, "spreadFactors": [7, 8, 9, 10, 11, 12]},
//!     {"modulation": "FSK", "frequency": 868800000, "bandwidth": 125, "bitRate": 50000}
//!   ]
//! }
//! ```

use lcm_plan::GatewayId;
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::FetchError;
use crate::{ConfigurationResponse, ConfigurationSource};

/// Client for the gateway configuration API
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    server: Url,
    token: Option<String>,
}

impl HttpSource {
    /// Create a client for `server`
    ///
    /// `server` may be a full URL or a bare `host:port`, in which case plain
    /// HTTP is assumed. `token` is sent as a bearer token when set.
    pub fn new(server: &str, token: Option<String>) -> Result<Self, FetchError> {
        let server = parse_server(server)?;
        let client = Client::builder()
            .user_agent(concat!("lora-channel-manager/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            server,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Base URL of the configuration API
    pub fn server(&self) -> &Url {
        &self.server
    }

    /// URL of the configuration endpoint for a gateway
    pub fn configuration_url(&self, gateway_id: GatewayId) -> String {
        format!(
            "{}/api/gateways/{}/configuration",
            self.server.as_str().trim_end_matches('/'),
            gateway_id
        )
    }
}

fn parse_server(server: &str) -> Result<Url, FetchError> {
    let server = server.trim();
    let with_scheme = if server.contains("://") {
        server.to_string()
    } else {
        format!("http://{server}")
    };

    let url = Url::parse(&with_scheme).map_err(|e| FetchError::InvalidServer {
        address: server.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(FetchError::InvalidServer {
            address: server.to_string(),
            reason: format!("unsupported scheme {scheme}"),
        }),
    }
}

impl ConfigurationSource for HttpSource {
    async fn get_configuration(
        &self,
        gateway_id: GatewayId,
    ) -> Result<ConfigurationResponse, FetchError> {
        let url = self.configuration_url(gateway_id);
        debug!(url = %url, "requesting gateway configuration");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        ConfigurationResponse::from_json(&body)
    }
}
