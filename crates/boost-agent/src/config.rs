//! Application configuration.

use crate::error::{AppError, AppResult};
use boost_core::Network;
use boost_oracle::PythConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Oracle configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Hermes endpoint base URL.
    #[serde(default = "default_oracle_endpoint")]
    pub endpoint: String,
    /// Maximum acceptable price age in seconds.
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: i64,
    /// Symbol to feed-id overrides; merged over the built-in feeds.
    #[serde(default)]
    pub feeds: HashMap<String, String>,
}

fn default_oracle_endpoint() -> String {
    "https://hermes.pyth.network".to_string()
}

fn default_max_age_secs() -> i64 {
    120
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: default_oracle_endpoint(),
            max_age_secs: default_max_age_secs(),
            feeds: HashMap::new(),
        }
    }
}

impl From<OracleConfig> for PythConfig {
    fn from(cfg: OracleConfig) -> Self {
        let mut pyth = PythConfig::default();
        pyth.endpoint = cfg.endpoint;
        pyth.max_age_secs = cfg.max_age_secs;
        pyth.feeds.extend(cfg.feeds);
        pyth
    }
}

/// Trading defaults section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Target leverage when a request does not specify one. Default: 1.5.
    #[serde(default = "default_leverage")]
    pub default_leverage: Decimal,
    /// Swap slippage tolerance (bps). Default: 50 (0.5%).
    #[serde(default = "default_slippage_bps")]
    pub default_slippage_bps: u32,
    /// Hard ceiling on requested slippage (bps). Default: 300.
    #[serde(default = "default_max_slippage_bps")]
    pub max_slippage_bps: u32,
    /// Lending-market liquidation threshold. Default: 0.8.
    #[serde(default = "default_liquidation_threshold")]
    pub liquidation_threshold: Decimal,
}

fn default_leverage() -> Decimal {
    Decimal::new(15, 1)
}

fn default_slippage_bps() -> u32 {
    50
}

fn default_max_slippage_bps() -> u32 {
    300
}

fn default_liquidation_threshold() -> Decimal {
    Decimal::new(8, 1)
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            default_leverage: default_leverage(),
            default_slippage_bps: default_slippage_bps(),
            max_slippage_bps: default_max_slippage_bps(),
            liquidation_threshold: default_liquidation_threshold(),
        }
    }
}

/// Confirmation poller section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerSettings {
    /// Seconds between status lookups. Default: 5.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Lookup budget before giving up. Default: 60 (5 minutes at 5s).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_max_attempts() -> u32 {
    60
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl From<PollerSettings> for boost_chain::PollerConfig {
    fn from(cfg: PollerSettings) -> Self {
        Self {
            poll_interval: std::time::Duration::from_secs(cfg.poll_interval_secs),
            max_attempts: cfg.max_attempts,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Target network. Default: mainnet.
    #[serde(default)]
    pub network: Network,
    /// Stacks API base URL; the network's default when absent.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Oracle configuration.
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Trading defaults.
    #[serde(default)]
    pub trading: TradingConfig,
    /// Confirmation poller settings.
    #[serde(default)]
    pub poller: PollerSettings,
    /// Venue priority order for quote tie-breaking. Default: all venues.
    #[serde(default = "default_venues")]
    pub venues: Vec<String>,
}

fn default_venues() -> Vec<String> {
    vec![
        "alex".to_string(),
        "velar".to_string(),
        "bitflow".to_string(),
        "faktory".to_string(),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            api_url: None,
            oracle: OracleConfig::default(),
            trading: TradingConfig::default(),
            poller: PollerSettings::default(),
            venues: default_venues(),
        }
    }
}

impl AppConfig {
    /// Load configuration, falling back to defaults when no file exists.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var("BOOST_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Stacks API base URL, explicit or the network default.
    pub fn api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| self.network.default_api_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.trading.default_leverage, dec!(1.5));
        assert_eq!(config.trading.liquidation_threshold, dec!(0.8));
        assert_eq!(config.poller.max_attempts, 60);
        assert_eq!(config.venues.len(), 4);
    }

    #[test]
    fn test_api_url_falls_back_to_network_default() {
        let config = AppConfig::default();
        assert_eq!(config.api_url(), "https://api.hiro.so");

        let explicit = AppConfig {
            api_url: Some("https://stacks.example.com".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(explicit.api_url(), "https://stacks.example.com");
    }

    #[test]
    fn test_parse_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            network = "testnet"

            [trading]
            default_leverage = "2"
            "#,
        )
        .unwrap();

        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.trading.default_leverage, dec!(2));
        assert_eq!(config.trading.default_slippage_bps, 50);
        assert_eq!(config.poller.poll_interval_secs, 5);
    }

    #[test]
    fn test_oracle_feed_overrides_merge() {
        let mut cfg = OracleConfig::default();
        cfg.feeds
            .insert("BTC/USD".to_string(), "deadbeef".to_string());

        let pyth: PythConfig = cfg.into();
        assert_eq!(pyth.feeds.get("BTC/USD").map(String::as_str), Some("deadbeef"));
        // Built-in feeds not overridden survive the merge.
        assert!(pyth.feeds.contains_key("STX/USD"));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("network"));
        assert!(toml_str.contains("default_leverage"));
    }
}
