//! The poll loop
//!
//! One cycle fetches the gateway's channel plan and, when it changed since
//! the last applied plan, rewrites the packet-forwarder configuration and
//! restarts the forwarder. Cycles run one after another; a failed cycle is
//! logged and retried on the next tick.

use std::path::Path;

use chrono::{DateTime, Utc};
use lcm_config::{load_document, merge_plan, render_document};
use lcm_plan::{allocate, classify};
use lcm_source::ConfigurationSource;
use tracing::{debug, error, info, warn};

use crate::error::CycleError;
use crate::restart::invoke_restart;
use crate::settings::Settings;
use crate::sleeper::Sleeper;

/// Result of a successful poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The plan's timestamp matched the last applied one
    Unchanged,
    /// A new configuration was written and the forwarder restarted
    Applied { updated_at: DateTime<Utc> },
}

/// Owns the poll loop state and drives cycles against a plan source
pub struct Orchestrator<S> {
    settings: Settings,
    source: S,
    last_updated_at: Option<DateTime<Utc>>,
}

impl<S: ConfigurationSource> Orchestrator<S> {
    pub fn new(settings: Settings, source: S) -> Self {
        Self {
            settings,
            source,
            last_updated_at: None,
        }
    }

    /// Timestamp of the last plan that was fully applied
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated_at
    }

    /// Poll until `sleeper` says stop
    pub async fn run<T: Sleeper>(&mut self, sleeper: &mut T) {
        loop {
            info!("checking for updated configuration");
            match self.poll_once().await {
                Ok(CycleOutcome::Applied { updated_at }) => {
                    info!(%updated_at, "configuration updated");
                }
                Ok(CycleOutcome::Unchanged) => {}
                Err(e) => error!(error = %e, "update config error"),
            }

            info!(
                interval = ?self.settings.poll_interval,
                last_applied = ?self.last_updated_at(),
                "sleeping until next update check"
            );
            if !sleeper.sleep(self.settings.poll_interval).await {
                debug!("poll loop stopped");
                return;
            }
        }
    }

    /// Run a single poll cycle
    ///
    /// The last applied timestamp only advances once the restart command
    /// succeeded.
    pub async fn poll_once(&mut self) -> Result<CycleOutcome, CycleError> {
        let response = self
            .source
            .get_configuration(self.settings.gateway_id)
            .await?;

        if self.last_updated_at == Some(response.updated_at) {
            info!(updated_at = %response.updated_at, "configuration is up to date");
            return Ok(CycleOutcome::Unchanged);
        }

        let base = load_document(&self.settings.base_config_file).map_err(CycleError::Load)?;

        let allocation = allocate(&response.channels);
        if !allocation.all_covered() {
            warn!("not every channel fits a radio window");
        }
        let plan = classify(response.updated_at, &response.channels, &allocation)?;

        let merged =
            merge_plan(&base, &plan, self.settings.gateway_id).map_err(CycleError::Merge)?;
        let rendered = render_document(&merged).map_err(CycleError::Render)?;

        write_atomic(&self.settings.output_config_file, &rendered).await?;
        info!(
            path = %self.settings.output_config_file.display(),
            updated_at = %plan.updated_at,
            radios = allocation.enabled_radios(),
            multi_sf_channels = plan.multi_sf_count(),
            "new configuration written"
        );

        invoke_restart(&self.settings.restart_command).await?;

        self.last_updated_at = Some(response.updated_at);
        Ok(CycleOutcome::Applied {
            updated_at: response.updated_at,
        })
    }
}

/// Write `contents` to a temp file next to `path`, then rename it over `path`
async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), CycleError> {
    let write_error = |source| CycleError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    tokio::fs::write(&tmp, contents).await.map_err(write_error)?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(write_error(e));
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::TimeZone;
    use lcm_config::ConfigError;
    use lcm_plan::{Channel, GatewayId};
    use lcm_source::{ConfigurationResponse, FetchError};
    use serde_json::Value;
    use tempfile::TempDir;

    const BASE: &str = r#"{
        /* managed by lora-channel-manager */
        "SX1301_conf": {
            "lorawan_public": true,
            "radio_0": {"enable": false, "type": "SX1257", "freq": 0},
            "radio_1": {"enable": false, "type": "SX1257", "freq": 0},
            "chan_multiSF_0": {}, "chan_multiSF_1": {}, "chan_multiSF_2": {}, "chan_multiSF_3": {},
            "chan_multiSF_4": {}, "chan_multiSF_5": {}, "chan_multiSF_6": {}, "chan_multiSF_7": {},
            "chan_Lora_std": {},
            "chan_FSK": {}
        },
        "gateway_conf": {"server_address": "localhost", "serv_port_up": 1700}
    }"#;

    /// Hands out queued responses, then repeats the last one
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<ConfigurationResponse, FetchError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<ConfigurationResponse, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ConfigurationSource for ScriptedSource {
        async fn get_configuration(
            &self,
            _gateway_id: GatewayId,
        ) -> Result<ConfigurationResponse, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                return responses.pop_front().unwrap();
            }
            match responses.front().unwrap() {
                Ok(response) => Ok(response.clone()),
                Err(_) => Err(unreachable_plan()),
            }
        }
    }

    fn unreachable_plan() -> FetchError {
        FetchError::Read {
            path: PathBuf::from("/srv/plans/0102030405060708.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
    }

    struct CountingSleeper {
        remaining: usize,
        slept: Vec<Duration>,
    }

    impl Sleeper for CountingSleeper {
        async fn sleep(&mut self, interval: Duration) -> bool {
            self.slept.push(interval);
            self.remaining = self.remaining.saturating_sub(1);
            self.remaining > 0
        }
    }

    struct Fixture {
        dir: TempDir,
        settings: Settings,
    }

    impl Fixture {
        fn new(restart_command: &str) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let base_config_file = dir.path().join("global_conf.json.base");
            std::fs::write(&base_config_file, BASE).unwrap();

            let settings = Settings {
                gateway_id: "0102030405060708".parse().unwrap(),
                base_config_file,
                output_config_file: dir.path().join("global_conf.json"),
                restart_command: restart_command.to_string(),
                poll_interval: Duration::from_secs(300),
            };
            Self { dir, settings }
        }

        fn output_path(&self) -> PathBuf {
            self.settings.output_config_file.clone()
        }

        fn output(&self) -> Value {
            let text = std::fs::read_to_string(self.output_path()).unwrap();
            serde_json::from_str(&text).unwrap()
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_493_640_000 + secs, 0).unwrap()
    }

    fn eu868(updated_at: DateTime<Utc>) -> ConfigurationResponse {
        ConfigurationResponse {
            updated_at,
            channels: vec![
                Channel::lora(868_100_000, 125, vec![7, 8, 9, 10, 11, 12]),
                Channel::lora(868_300_000, 125, vec![7, 8, 9, 10, 11, 12]),
                Channel::lora(868_500_000, 125, vec![7, 8, 9, 10, 11, 12]),
            ],
        }
    }

    #[tokio::test]
    async fn test_applies_new_plan() {
        let fixture = Fixture::new("true");
        let source = ScriptedSource::new(vec![Ok(eu868(at(0)))]);
        let mut orchestrator = Orchestrator::new(fixture.settings.clone(), source);

        let outcome = orchestrator.poll_once().await.unwrap();
        assert_eq!(outcome, CycleOutcome::Applied { updated_at: at(0) });
        assert_eq!(orchestrator.last_updated_at(), Some(at(0)));

        let output = fixture.output();
        assert_eq!(output["SX1301_conf"]["radio_0"]["enable"], true);
        assert_eq!(output["SX1301_conf"]["radio_0"]["freq"], 868_500_000);
        assert_eq!(output["SX1301_conf"]["radio_1"]["enable"], false);
        assert_eq!(output["SX1301_conf"]["chan_multiSF_0"]["if"], -400_000);
        assert_eq!(output["SX1301_conf"]["lorawan_public"], true);
        assert_eq!(output["gateway_conf"]["gateway_ID"], "0102030405060708");
        assert_eq!(output["gateway_conf"]["serv_port_up"], 1700);

        // no temp file left behind
        let entries = std::fs::read_dir(fixture.dir.path()).unwrap().count();
        assert_eq!(entries, 2);
    }

    #[tokio::test]
    async fn test_same_timestamp_is_skipped() {
        let fixture = Fixture::new("true");
        let source = ScriptedSource::new(vec![Ok(eu868(at(0)))]);
        let mut orchestrator = Orchestrator::new(fixture.settings.clone(), source);

        orchestrator.poll_once().await.unwrap();
        std::fs::remove_file(fixture.output_path()).unwrap();

        let outcome = orchestrator.poll_once().await.unwrap();
        assert_eq!(outcome, CycleOutcome::Unchanged);
        assert!(!fixture.output_path().exists());
    }

    #[tokio::test]
    async fn test_changed_timestamp_is_applied() {
        let fixture = Fixture::new("true");
        let source = ScriptedSource::new(vec![Ok(eu868(at(0))), Ok(eu868(at(60)))]);
        let mut orchestrator = Orchestrator::new(fixture.settings.clone(), source);

        orchestrator.poll_once().await.unwrap();
        let outcome = orchestrator.poll_once().await.unwrap();
        assert_eq!(outcome, CycleOutcome::Applied { updated_at: at(60) });
        assert_eq!(orchestrator.last_updated_at(), Some(at(60)));
    }

    #[tokio::test]
    async fn test_merge_failure_writes_nothing() {
        let fixture = Fixture::new("true");
        std::fs::write(
            &fixture.settings.base_config_file,
            r#"{"SX1301_conf": {"radio_0": {}, "radio_1": {}}, "gateway_conf": {}}"#,
        )
        .unwrap();
        let source = ScriptedSource::new(vec![Ok(eu868(at(0)))]);
        let mut orchestrator = Orchestrator::new(fixture.settings.clone(), source);

        let err = orchestrator.poll_once().await.unwrap_err();
        assert!(matches!(
            err,
            CycleError::Merge(ConfigError::Structural { .. })
        ));
        assert!(!fixture.output_path().exists());
        assert_eq!(orchestrator.last_updated_at(), None);
    }

    #[tokio::test]
    async fn test_missing_base_file() {
        let fixture = Fixture::new("true");
        std::fs::remove_file(&fixture.settings.base_config_file).unwrap();
        let source = ScriptedSource::new(vec![Ok(eu868(at(0)))]);
        let mut orchestrator = Orchestrator::new(fixture.settings.clone(), source);

        let err = orchestrator.poll_once().await.unwrap_err();
        assert!(matches!(err, CycleError::Load(ConfigError::Read { .. })));
        assert!(!fixture.output_path().exists());
    }

    #[tokio::test]
    async fn test_unparseable_base_file() {
        let fixture = Fixture::new("true");
        std::fs::write(&fixture.settings.base_config_file, "{\"SX1301_conf\": /* cut */").unwrap();
        let source = ScriptedSource::new(vec![Ok(eu868(at(0)))]);
        let mut orchestrator = Orchestrator::new(fixture.settings.clone(), source);

        let err = orchestrator.poll_once().await.unwrap_err();
        assert!(matches!(err, CycleError::Load(ConfigError::Parse(_))));
        assert!(!fixture.output_path().exists());
    }

    #[tokio::test]
    async fn test_restart_failure_retries_next_cycle() {
        let mut fixture = Fixture::new("false");
        let source = ScriptedSource::new(vec![Ok(eu868(at(0)))]);
        let mut orchestrator = Orchestrator::new(fixture.settings.clone(), source);

        let err = orchestrator.poll_once().await.unwrap_err();
        assert!(matches!(err, CycleError::Restart(_)));
        // the configuration was still written
        assert!(fixture.output_path().exists());
        assert_eq!(orchestrator.last_updated_at(), None);

        fixture.settings.restart_command = "true".to_string();
        let mut orchestrator = Orchestrator::new(fixture.settings.clone(), orchestrator.source);
        let outcome = orchestrator.poll_once().await.unwrap();
        assert_eq!(outcome, CycleOutcome::Applied { updated_at: at(0) });
    }

    #[tokio::test]
    async fn test_empty_restart_command_fails_cycle() {
        let fixture = Fixture::new("");
        let source = ScriptedSource::new(vec![Ok(eu868(at(0)))]);
        let mut orchestrator = Orchestrator::new(fixture.settings.clone(), source);

        let err = orchestrator.poll_once().await.unwrap_err();
        assert!(matches!(err, CycleError::Restart(_)));
        assert_eq!(orchestrator.last_updated_at(), None);
    }

    #[tokio::test]
    async fn test_fetch_error() {
        let fixture = Fixture::new("true");
        let source = ScriptedSource::new(vec![Err(unreachable_plan())]);
        let mut orchestrator = Orchestrator::new(fixture.settings.clone(), source);

        let err = orchestrator.poll_once().await.unwrap_err();
        assert!(matches!(err, CycleError::Fetch(FetchError::Read { .. })));
        assert!(!fixture.output_path().exists());
    }

    #[tokio::test]
    async fn test_plan_error() {
        let fixture = Fixture::new("true");
        let mut response = eu868(at(0));
        response.channels.push(Channel::fsk(868_800_000, 125, 50_000));
        response.channels.push(Channel::fsk(868_900_000, 125, 50_000));
        let source = ScriptedSource::new(vec![Ok(response)]);
        let mut orchestrator = Orchestrator::new(fixture.settings.clone(), source);

        let err = orchestrator.poll_once().await.unwrap_err();
        assert!(matches!(err, CycleError::Plan(_)));
        assert!(!fixture.output_path().exists());
    }

    #[tokio::test]
    async fn test_run_polls_every_tick() {
        let fixture = Fixture::new("true");
        let source = ScriptedSource::new(vec![
            Ok(eu868(at(0))),
            Err(unreachable_plan()),
            Ok(eu868(at(0))),
        ]);
        let mut orchestrator = Orchestrator::new(fixture.settings.clone(), source);
        let mut sleeper = CountingSleeper {
            remaining: 3,
            slept: Vec::new(),
        };

        orchestrator.run(&mut sleeper).await;

        assert_eq!(orchestrator.source.calls(), 3);
        assert_eq!(sleeper.slept, vec![Duration::from_secs(300); 3]);
        assert_eq!(orchestrator.last_updated_at(), Some(at(0)));
    }

    #[tokio::test]
    async fn test_base_reloaded_each_cycle() {
        let fixture = Fixture::new("true");
        let source = ScriptedSource::new(vec![Ok(eu868(at(0))), Ok(eu868(at(60)))]);
        let mut orchestrator = Orchestrator::new(fixture.settings.clone(), source);

        orchestrator.poll_once().await.unwrap();
        assert_eq!(fixture.output()["gateway_conf"]["serv_port_up"], 1700);

        let edited = BASE.replace("\"serv_port_up\": 1700", "\"serv_port_up\": 1800");
        std::fs::write(&fixture.settings.base_config_file, edited).unwrap();

        orchestrator.poll_once().await.unwrap();
        assert_eq!(fixture.output()["gateway_conf"]["serv_port_up"], 1800);
    }
}
