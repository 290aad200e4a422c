use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::binance::rest::DEFAULT_REST_BASE_URL;
use crate::market::format::DisplayLocale;
use crate::market::scheduler::FeedSettings;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
/// Environment override for `binance.rest_base_url`.
pub const BASE_URL_ENV: &str = "BINANCE_BASE_URL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub binance: BinanceConfig,
    pub refresh: RefreshConfig,
    pub display: DisplayConfig,
    pub ui: UiConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BinanceConfig {
    pub rest_base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            rest_base_url: DEFAULT_REST_BASE_URL.to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub locale: DisplayLocale,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Serve the JSON view when set, e.g. `127.0.0.1:8787`.
    pub listen_addr: Option<SocketAddr>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl BinanceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Config {
    /// `.env`, then `config/default.toml` when present, then environment overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = Path::new(DEFAULT_CONFIG_PATH);
        let mut config = if config_path.exists() {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.binance.rest_base_url = url.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.binance.rest_base_url.trim().is_empty() {
            bail!("binance.rest_base_url must not be empty");
        }
        if self.binance.request_timeout_ms == 0 {
            bail!("binance.request_timeout_ms must be > 0");
        }
        if self.refresh.interval_secs == 0 {
            bail!("refresh.interval_secs must be > 0");
        }
        if self.ui.refresh_rate_ms == 0 {
            bail!("ui.refresh_rate_ms must be > 0");
        }
        Ok(())
    }

    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            interval: Duration::from_secs(self.refresh.interval_secs),
            locale: self.display.locale,
        }
    }
}
