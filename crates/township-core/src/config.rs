//! Configuration loading and typed config structures for the Township
//! simulation.
//!
//! The canonical configuration lives in `township-config.yaml` at the project
//! root. Every section is optional; anything left out falls back to the
//! values the simulation was balanced around.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use township_agents::{
    EconomyConfig, LaborConfig, OrganizationConfig, SocialConfig, WellbeingConfig,
};
use township_ledger::PricingConfig;
use township_types::Retention;
use township_world::{MiningConfig, SeasonalConfig};

/// Environment variable replacing `world.snapshot_path`.
pub const ENV_SNAPSHOT_PATH: &str = "TOWNSHIP_SNAPSHOT_PATH";

/// Environment variable replacing `world.tick_interval_ms`.
pub const ENV_TICK_INTERVAL_MS: &str = "TOWNSHIP_TICK_INTERVAL_MS";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `township-config.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, timing, persistence).
    #[serde(default)]
    pub world: WorldConfig,

    /// Labor state machine.
    #[serde(default)]
    pub labor: LaborConfig,

    /// Wellbeing deltas.
    #[serde(default)]
    pub wellbeing: WellbeingConfig,

    /// Payroll, rent, transfers, and investment.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Price discovery.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Mining pool.
    #[serde(default)]
    pub mining: MiningConfig,

    /// Seasonal events.
    #[serde(default)]
    pub seasonal: SeasonalConfig,

    /// Relationships, groups, projects, therapy.
    #[serde(default)]
    pub social: SocialConfig,

    /// Departments, union, careers.
    #[serde(default)]
    pub organization: OrganizationConfig,

    /// Bounded log sizes.
    #[serde(default)]
    pub retention: Retention,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `TOWNSHIP_SNAPSHOT_PATH` overrides `world.snapshot_path`
    /// - `TOWNSHIP_TICK_INTERVAL_MS` overrides `world.tick_interval_ms`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.world.apply_env_overrides();
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults. Environment
    /// overrides apply either way.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            let mut config = Self::default();
            config.world.apply_env_overrides();
            Ok(config)
        }
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed. Omit for an entropy-seeded run.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Where the world snapshot document lives.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: None,
            tick_interval_ms: default_tick_interval_ms(),
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl WorldConfig {
    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup.
    ///
    /// An unparsable tick interval is ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_SNAPSHOT_PATH) {
            self.snapshot_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_TICK_INTERVAL_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.tick_interval_ms = ms,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring invalid tick interval override"),
            }
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is
    /// unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_world_name() -> String {
    String::from("Township")
}

const fn default_tick_interval_ms() -> u64 {
    3_600_000
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data/world-snapshot.json")
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.tick_interval_ms, 3_600_000);
        assert_eq!(
            config.world.snapshot_path,
            PathBuf::from("data/world-snapshot.json")
        );
        assert_eq!(config.retention.events, 200);
        assert_eq!(config.economy.ticks_per_day, 24);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = r"
world:
  name: Test Town
  seed: 7
social:
  matchmaking_probability: 0.5
retention:
  events: 10
logging:
  json: true
";
        let mut config: SimulationConfig = serde_yml::from_str(yaml).unwrap();
        config.world.apply_overrides(|_| None);

        assert_eq!(config.world.name, "Test Town");
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.world.tick_interval_ms, 3_600_000);
        assert!((config.social.matchmaking_probability - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.social.max_groups, 8);
        assert_eq!(config.retention.events, 10);
        assert_eq!(config.retention.transactions, 500);
        assert!(config.logging.json);
    }

    #[test]
    fn empty_yaml_is_all_defaults() {
        let config: SimulationConfig = serde_yml::from_str("{}").unwrap();
        assert_eq!(config.world, WorldConfig::default());
    }

    #[test]
    fn overrides_replace_world_settings() {
        let mut world = WorldConfig::default();
        world.apply_overrides(|key| match key {
            ENV_SNAPSHOT_PATH => Some(String::from("/tmp/town.json")),
            ENV_TICK_INTERVAL_MS => Some(String::from("250")),
            _ => None,
        });
        assert_eq!(world.snapshot_path, PathBuf::from("/tmp/town.json"));
        assert_eq!(world.tick_interval_ms, 250);
    }

    #[test]
    fn bad_interval_override_is_ignored() {
        let mut world = WorldConfig::default();
        world.apply_overrides(|key| (key == ENV_TICK_INTERVAL_MS).then(|| String::from("soon")));
        assert_eq!(world.tick_interval_ms, 3_600_000);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(SimulationConfig::parse("world: [unclosed").is_err());
    }
}
