//! lora-channel-manager
//!
//! Polls the network server for a gateway's channel plan and keeps the
//! packet-forwarder configuration in sync with it.

mod error;
mod orchestrator;
mod restart;
mod settings;
mod sleeper;
mod source;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::orchestrator::Orchestrator;
use crate::settings::Cli;
use crate::sleeper::TokioSleeper;
use crate::source::PlanSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lora_channel_manager=info,lcm_plan=info,lcm_config=info,lcm_source=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let settings = cli.settings()?;
    let source = PlanSource::from_cli(&cli).context("setup configuration client error")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        gateway_id = %settings.gateway_id,
        source = %source.describe(),
        base_config_file = %settings.base_config_file.display(),
        output_config_file = %settings.output_config_file.display(),
        poll_interval = ?settings.poll_interval,
        "starting LoRa Channel Manager"
    );

    let mut orchestrator = Orchestrator::new(settings, source);
    let mut sleeper = TokioSleeper;

    tokio::select! {
        _ = orchestrator.run(&mut sleeper) => {}
        signal = shutdown_signal() => {
            let signal = signal.context("install signal handler error")?;
            tracing::info!(signal, "signal received, stopping");
        }
    }

    Ok(())
}

/// Resolves on SIGINT or SIGTERM with the signal's name
#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|_| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|_| "SIGINT")
}
