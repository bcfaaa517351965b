//! Command line and runtime settings

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use lcm_plan::GatewayId;

/// Channel-configuration daemon for LoRa gateways
#[derive(Parser, Debug, Clone)]
#[command(name = "lora-channel-manager", version, about)]
pub struct Cli {
    /// Gateway identifier (EUI-64, hex).
    #[arg(long = "gw-id", alias = "gw-mac", env = "GW_MAC")]
    pub gw_id: String,

    /// host:port or URL of the gateway configuration API.
    #[arg(long, env = "GW_SERVER", default_value = "127.0.0.1:8002")]
    pub gw_server: String,

    /// JWT token used to authenticate against the gateway configuration API.
    #[arg(long, env = "GW_CLIENT_JWT_TOKEN")]
    pub gw_client_jwt_token: Option<String>,

    /// Read the channel plan from this file instead of the API.
    #[arg(long, env = "GW_CONFIG_FILE")]
    pub gw_config_file: Option<PathBuf>,

    /// Path to the base packet-forwarder configuration file.
    #[arg(long, env = "BASE_CONFIG_FILE")]
    pub base_config_file: PathBuf,

    /// Path to the output packet-forwarder configuration file.
    #[arg(long, env = "OUTPUT_CONFIG_FILE")]
    pub output_config_file: PathBuf,

    /// Command executed after writing a new configuration, to restart the packet-forwarder.
    #[arg(long, env = "PF_RESTART_COMMAND", default_value = "")]
    pub pf_restart_command: String,

    /// Interval between polls for new configuration (e.g. 300s, 5m, 1h).
    #[arg(long, env = "CONFIG_POLL_INTERVAL", default_value = "5m", value_parser = parse_duration)]
    pub config_poll_interval: Duration,
}

impl Cli {
    /// Validate the command line into immutable settings
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let gateway_id = self
            .gw_id
            .parse::<GatewayId>()
            .with_context(|| format!("invalid gw-id {:?}", self.gw_id))?;

        Ok(Settings {
            gateway_id,
            base_config_file: self.base_config_file.clone(),
            output_config_file: self.output_config_file.clone(),
            restart_command: self.pf_restart_command.clone(),
            poll_interval: self.config_poll_interval,
        })
    }
}

/// Settings the poll loop runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub gateway_id: GatewayId,
    pub base_config_file: PathBuf,
    pub output_config_file: PathBuf,
    pub restart_command: String,
    pub poll_interval: Duration,
}

/// Parse a humantime duration (`250ms`, `30s`, `5m`, `1h 30m`) or a plain
/// number of seconds
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return s
            .parse()
            .map(Duration::from_secs)
            .map_err(|e| format!("invalid duration {s:?}: {e}"));
    }
    humantime::parse_duration(s).map_err(|e| format!("invalid duration {s:?}: {e}"))
}
