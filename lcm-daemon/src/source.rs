//! Channel plan source selection

use lcm_plan::GatewayId;
use lcm_source::{
    ConfigurationResponse, ConfigurationSource, FetchError, FileSource, HttpSource,
};

use crate::settings::Cli;

/// The channel plan source chosen on the command line
#[derive(Debug, Clone)]
pub enum PlanSource {
    Http(HttpSource),
    File(FileSource),
}

impl PlanSource {
    /// A plan file takes precedence over the API server
    pub fn from_cli(cli: &Cli) -> Result<Self, FetchError> {
        match &cli.gw_config_file {
            Some(path) => Ok(PlanSource::File(FileSource::new(path))),
            None => HttpSource::new(&cli.gw_server, cli.gw_client_jwt_token.clone())
                .map(PlanSource::Http),
        }
    }

    /// Server URL or plan file path, for logging
    pub fn describe(&self) -> String {
        match self {
            PlanSource::Http(source) => source.server().to_string(),
            PlanSource::File(source) => source.path().display().to_string(),
        }
    }
}

impl ConfigurationSource for PlanSource {
    async fn get_configuration(
        &self,
        gateway_id: GatewayId,
    ) -> Result<ConfigurationResponse, FetchError> {
        match self {
            PlanSource::Http(source) => source.get_configuration(gateway_id).await,
            PlanSource::File(source) => source.get_configuration(gateway_id).await,
        }
    }
}
