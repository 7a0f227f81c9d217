use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::model::candle::BucketWidth;
use crate::model::shock::Shock;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const CONFIG_PATH_ENV: &str = "CANDLE_SIM_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chart: ChartConfig,
    pub ticker: TickerConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub bucket_width_seconds: i64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bucket_width_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    pub tick_interval_ms: u64,
    pub initial_price: f64,
    pub max_step: f64,
    pub buy_multiplier: f64,
    pub sell_multiplier: f64,
    pub price_floor: f64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            initial_price: 150.0,
            max_step: 1.0,
            buy_multiplier: 1.05,
            sell_multiplier: 0.95,
            price_floor: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    pub symbol: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 100,
            symbol: "SIM".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: "candle-sim.log".to_string(),
        }
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

impl ChartConfig {
    pub fn bucket_width(&self) -> Result<BucketWidth, ConfigError> {
        BucketWidth::new(self.bucket_width_seconds)
    }
}

impl TickerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn multiplier(&self, shock: Shock) -> f64 {
        match shock {
            Shock::Buy => self.buy_multiplier,
            Shock::Sell => self.sell_multiplier,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if !is_positive(self.buy_multiplier) {
            return Err(ConfigError::InvalidMultiplier {
                name: "buy",
                value: self.buy_multiplier,
            });
        }
        if !is_positive(self.sell_multiplier) {
            return Err(ConfigError::InvalidMultiplier {
                name: "sell",
                value: self.sell_multiplier,
            });
        }
        if !self.price_floor.is_finite() || self.price_floor < 0.0 {
            return Err(ConfigError::InvalidPriceFloor(self.price_floor));
        }
        if !self.initial_price.is_finite() || self.initial_price < self.price_floor {
            return Err(ConfigError::InvalidInitialPrice {
                price: self.initial_price,
                floor: self.price_floor,
            });
        }
        if !is_positive(self.max_step) {
            return Err(ConfigError::InvalidMaxStep(self.max_step));
        }
        Ok(())
    }
}

impl Config {
    /// Load from `$CANDLE_SIM_CONFIG`, or `config/default.toml` when unset.
    /// A missing default file falls back to built-in defaults.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load_from_path(&PathBuf::from(path)),
            Err(_) => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if !path.exists() {
                    let config = Config::default();
                    config.validate()?;
                    return Ok(config);
                }
                Self::load_from_path(path)
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("invalid config in {}", path.display()))
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("failed to parse config toml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chart.bucket_width()?;
        self.ticker.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chart.bucket_width().unwrap().seconds(), 60);
        assert_eq!(config.ticker.tick_interval(), Duration::from_millis(1000));
        assert!((config.ticker.multiplier(Shock::Buy) - 1.05).abs() < f64::EPSILON);
        assert!((config.ticker.multiplier(Shock::Sell) - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
[chart]
bucket_width_seconds = 5
"#,
        )
        .unwrap();
        assert_eq!(config.chart.bucket_width_seconds, 5);
        assert_eq!(config.ticker.tick_interval_ms, 1000);
        assert_eq!(config.ui.symbol, "SIM");
    }

    #[test]
    fn initial_price_below_floor_is_rejected() {
        let ticker = TickerConfig {
            initial_price: 1.0,
            price_floor: 2.0,
            ..TickerConfig::default()
        };
        assert_eq!(
            ticker.validate(),
            Err(ConfigError::InvalidInitialPrice {
                price: 1.0,
                floor: 2.0
            })
        );
    }
}
