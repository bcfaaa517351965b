//! Poll cycle errors

use std::path::PathBuf;

use lcm_config::ConfigError;
use lcm_plan::PlanError;
use lcm_source::FetchError;
use thiserror::Error;

use crate::restart::RestartError;

/// Errors that abandon a poll cycle
///
/// None of these are fatal; the next cycle starts over.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("get packet-forwarder config error: {0}")]
    Fetch(#[from] FetchError),

    #[error("load config file error: {0}")]
    Load(#[source] ConfigError),

    #[error("compute channel plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("merge config error: {0}")]
    Merge(#[source] ConfigError),

    #[error("render config error: {0}")]
    Render(#[source] ConfigError),

    #[error("write file error: {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invoke packet-forwarder restart error: {0}")]
    Restart(#[from] RestartError),
}
