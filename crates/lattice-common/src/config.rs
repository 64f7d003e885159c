//! Controller configuration: a serde-friendly `ConfigInput` (all fields
//! optional, TOML-deserialized) resolved into a typed `Config` with the
//! defaults from spec §6. Mirrors the teacher's
//! `rist_bonding_core::config::{SchedulerConfigInput, SchedulerConfig}` split.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::LatticeError;
use crate::ids::Policy;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigInput {
    pub stable_seconds: Option<f64>,
    pub echo_period: Option<f64>,
    pub delay_collect_period: Option<f64>,
    pub stats_collect_period: Option<f64>,
    pub port_stat_history: Option<usize>,
    pub default_policy: Option<String>,
    pub show_topo: Option<bool>,
    pub show_delay: Option<bool>,
    pub show_bandwidth: Option<bool>,
    pub show_loss: Option<bool>,
    pub persisted_paths_file: Option<PathBuf>,
    pub status_api_addr: Option<String>,
}

impl ConfigInput {
    pub fn from_toml_str(s: &str) -> Result<Self, LatticeError> {
        toml::from_str(s).map_err(|e| LatticeError::ConfigError(e.to_string()))
    }

    pub fn resolve(self) -> Result<Config, LatticeError> {
        let default_policy = match self.default_policy {
            Some(s) => s
                .parse()
                .map_err(|e| LatticeError::ConfigError(format!("default_policy: {e}")))?,
            None => Policy::default(),
        };

        let port_stat_history = self.port_stat_history.unwrap_or(5);
        if port_stat_history == 0 {
            return Err(LatticeError::ConfigError(
                "port_stat_history must be >= 1".into(),
            ));
        }

        Ok(Config {
            stable_seconds: Duration::from_secs_f64(self.stable_seconds.unwrap_or(5.0)),
            echo_period: Duration::from_secs_f64(self.echo_period.unwrap_or(0.05)),
            delay_collect_period: Duration::from_secs_f64(self.delay_collect_period.unwrap_or(5.0)),
            stats_collect_period: Duration::from_secs_f64(self.stats_collect_period.unwrap_or(5.0)),
            port_stat_history,
            default_policy,
            show_topo: self.show_topo.unwrap_or(false),
            show_delay: self.show_delay.unwrap_or(false),
            show_bandwidth: self.show_bandwidth.unwrap_or(false),
            show_loss: self.show_loss.unwrap_or(false),
            persisted_paths_file: self.persisted_paths_file,
            status_api_addr: self.status_api_addr,
        })
    }
}

/// Resolved, typed configuration — defaults match spec §6.
#[derive(Debug, Clone)]
pub struct Config {
    pub stable_seconds: Duration,
    pub echo_period: Duration,
    pub delay_collect_period: Duration,
    pub stats_collect_period: Duration,
    pub port_stat_history: usize,
    pub default_policy: Policy,
    pub show_topo: bool,
    pub show_delay: bool,
    pub show_bandwidth: bool,
    pub show_loss: bool,
    pub persisted_paths_file: Option<PathBuf>,
    pub status_api_addr: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        ConfigInput::default()
            .resolve()
            .expect("default config always resolves")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = Config::default();
        assert_eq!(cfg.stable_seconds, Duration::from_secs(5));
        assert_eq!(cfg.echo_period, Duration::from_millis(50));
        assert_eq!(cfg.port_stat_history, 5);
        assert_eq!(cfg.default_policy, Policy::Hop);
    }

    #[test]
    fn parses_toml_overrides() {
        let input = ConfigInput::from_toml_str(
            r#"
            stable_seconds = 2.5
            default_policy = "bandwidth"
            port_stat_history = 10
            "#,
        )
        .unwrap();
        let cfg = input.resolve().unwrap();
        assert_eq!(cfg.stable_seconds, Duration::from_secs_f64(2.5));
        assert_eq!(cfg.default_policy, Policy::Bandwidth);
        assert_eq!(cfg.port_stat_history, 10);
    }

    #[test]
    fn rejects_zero_history() {
        let input = ConfigInput {
            port_stat_history: Some(0),
            ..Default::default()
        };
        assert!(input.resolve().is_err());
    }

    #[test]
    fn rejects_unknown_policy() {
        let input = ConfigInput {
            default_policy: Some("fastest".into()),
            ..Default::default()
        };
        assert!(input.resolve().is_err());
    }
}
