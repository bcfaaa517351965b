//! Gateway identifier

use std::fmt;
use std::str::FromStr;

use crate::error::GatewayIdError;

/// 64-bit gateway identifier (EUI-64)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GatewayId(pub [u8; 8]);

impl GatewayId {
    /// Raw identifier bytes
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl fmt::Display for GatewayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for GatewayId {
    type Err = GatewayIdError;

    /// Parse from hex, allowing `:` or `-` separators between bytes
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s
            .trim()
            .chars()
            .filter(|c| *c != ':' && *c != '-')
            .collect();
        let bytes = hex::decode(&digits)?;
        let bytes: [u8; 8] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| GatewayIdError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}
