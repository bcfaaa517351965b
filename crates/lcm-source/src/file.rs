//! Local file channel plan source

use std::path::{Path, PathBuf};

use lcm_plan::GatewayId;
use tracing::debug;

use crate::error::FetchError;
use crate::{ConfigurationResponse, ConfigurationSource};

/// Reads the channel plan from a JSON file on every fetch
///
/// The file has the same shape as the HTTP API response. The gateway
/// identifier is not used for lookup.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigurationSource for FileSource {
    async fn get_configuration(
        &self,
        gateway_id: GatewayId,
    ) -> Result<ConfigurationResponse, FetchError> {
        debug!(path = %self.path.display(), gateway_id = %gateway_id, "reading channel plan file");

        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Read {
                path: self.path.clone(),
                source,
            })?;
        ConfigurationResponse::from_json(&body)
    }
}
