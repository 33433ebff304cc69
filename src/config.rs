use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Environment variable that overrides `output_dir`.
pub const OUTPUT_DIR_ENV: &str = "INDIR";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_sources")]
    pub sources: PathBuf,

    #[serde(default = "default_name_map")]
    pub name_map: Option<PathBuf>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Fetch attempts per URL within one pass.
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    #[serde(default)]
    pub retry_delay_ms: u64,
    /// Outer passes over entries that produced nothing.
    #[serde(default = "default_retry_passes")]
    pub retry_passes: u32,
    /// Max entries in flight; 0 launches every entry of a pass at once.
    #[serde(default)]
    pub concurrency: usize,
    /// Non-wildcard lists with fewer domains than this are treated as broken.
    #[serde(default)]
    pub min_domains: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Defaults
fn default_sources() -> PathBuf {
    PathBuf::from("blocklistConfig.json")
}
fn default_name_map() -> Option<PathBuf> {
    Some(PathBuf::from("valueUnameMap.json"))
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("blocklistfiles")
}
fn default_connect_timeout() -> u64 {
    15
}
fn default_read_timeout() -> u64 {
    30
}
fn default_total_timeout() -> u64 {
    180
}
fn default_user_agent() -> String {
    concat!("blocklist-fetch/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_attempts() -> u32 {
    2
}
fn default_retry_passes() -> u32 {
    1
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            name_map: default_name_map(),
            output_dir: default_output_dir(),
            fetch: FetchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            total_timeout_secs: default_total_timeout(),
            user_agent: default_user_agent(),
            attempts: default_attempts(),
            retry_delay_ms: 0,
            retry_passes: default_retry_passes(),
            concurrency: 0,
            min_domains: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl FetchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn total_timeout(&self) -> Duration {
        Duration::from_secs(self.total_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse config TOML")?;
        Ok(config)
    }

    /// Applies environment overrides (currently only the output directory).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(OUTPUT_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.output_dir = PathBuf::from(dir);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_timeouts() {
        let config = Config::default();
        assert_eq!(config.fetch.connect_timeout(), Duration::from_secs(15));
        assert_eq!(config.fetch.read_timeout(), Duration::from_secs(30));
        assert_eq!(config.fetch.total_timeout(), Duration::from_secs(180));
        assert_eq!(config.fetch.attempts, 2);
        assert_eq!(config.fetch.retry_passes, 1);
        assert_eq!(config.fetch.concurrency, 0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            output_dir = "out"

            [fetch]
            attempts = 3
            retry_passes = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.fetch.attempts, 3);
        assert_eq!(config.fetch.retry_passes, 0);
        assert_eq!(config.fetch.read_timeout_secs, 30);
        assert_eq!(config.sources, PathBuf::from("blocklistConfig.json"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(Config::from_toml("fetch = 3").is_err());
    }
}
