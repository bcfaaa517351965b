//! Gateway Channel Plan Sources
//!
//! This crate fetches the channel plan assigned to a gateway:
//!
//! - **HttpSource**: queries the gateway configuration API
//! - **FileSource**: reads the same JSON document from a local file, for
//!   static deployments
//!
//! Both return a [`ConfigurationResponse`], which carries the time the plan
//! was last changed upstream so callers can skip unchanged plans.

use std::future::Future;

use chrono::{DateTime, Utc};
use lcm_plan::{Channel, GatewayId};
use serde::{Deserialize, Serialize};

pub mod error;
pub mod file;
pub mod http;

pub use error::FetchError;
pub use file::FileSource;
pub use http::HttpSource;

/// Channel plan assigned to a gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationResponse {
    /// When the plan was last changed
    pub updated_at: DateTime<Utc>,
    /// Channels, in the order the server lists them
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl ConfigurationResponse {
    /// Decode a response body
    pub fn from_json(body: &[u8]) -> Result<Self, FetchError> {
        serde_json::from_slice(body).map_err(FetchError::Decode)
    }
}

/// Something that can provide the current channel plan of a gateway
pub trait ConfigurationSource {
    /// Fetch the current channel plan for `gateway_id`
    fn get_configuration(
        &self,
        gateway_id: GatewayId,
    ) -> impl Future<Output = Result<ConfigurationResponse, FetchError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lcm_plan::Modulation;

    #[test]
    fn test_decode_response() {
        let body = br#"{
            "updatedAt": "2017-05-01T12:00:00.123456Z",
            "channels": [
                {"modulation": "LORA", "frequency": 868100000, "bandwidth": 125, "spreadFactors": [7, 8, 9, 10, 11, 12]},
                {"modulation": "FSK", "frequency": 868800000, "bandwidth": 125, "bitRate": 50000}
            ]
        }"#;

        let response = ConfigurationResponse::from_json(body).unwrap();
        assert_eq!(
            response.updated_at,
            Utc.with_ymd_and_hms(2017, 5, 1, 12, 0, 0).unwrap()
                + chrono::Duration::microseconds(123_456)
        );
        assert_eq!(response.channels.len(), 2);
        assert_eq!(
            response.channels[0],
            Channel::lora(868_100_000, 125, vec![7, 8, 9, 10, 11, 12])
        );
        assert_eq!(response.channels[1].modulation, Modulation::Fsk);
        assert_eq!(response.channels[1].bit_rate, 50_000);
        assert!(response.channels[1].spread_factors.is_empty());
    }

    #[test]
    fn test_unknown_modulation_kept() {
        let body = br#"{"updatedAt": "2017-05-01T12:00:00Z", "channels": [
            {"modulation": "LR_FHSS", "frequency": 868100000, "bandwidth": 125}
        ]}"#;

        let response = ConfigurationResponse::from_json(body).unwrap();
        assert_eq!(
            response.channels[0].modulation,
            Modulation::Other("LR_FHSS".to_string())
        );
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let body = br#"{"updatedAt": "yesterday", "channels": []}"#;
        assert!(matches!(
            ConfigurationResponse::from_json(body),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_missing_channels_is_empty_plan() {
        let body = br#"{"updatedAt": "2017-05-01T12:00:00Z"}"#;
        let response = ConfigurationResponse::from_json(body).unwrap();
        assert!(response.channels.is_empty());
    }
}
