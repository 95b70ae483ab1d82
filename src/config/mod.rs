//! Configuration Module - TOML-based Simulator Configuration
//!
//! Loads and validates configuration from `config.toml`. Every field
//! has a serde default, so an empty file (or no file at all) yields a
//! runnable 50/50 market with `b = 10`.

pub mod loader;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// Process identity and logging.
  #[serde(default)]
  pub app: AppSection,
  /// Market opened at startup.
  #[serde(default)]
  pub market: MarketConfig,
  /// Session journal.
  #[serde(default)]
  pub journal: JournalConfig,
  /// Metrics and health endpoints.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// Process identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
  /// Human-readable name used in logs.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Log output format.
  #[serde(default)]
  pub log_format: LogFormat,
}

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
  /// Structured JSON lines.
  #[default]
  Json,
  /// Human-readable multi-line output.
  Pretty,
}

/// Market opened when the simulator starts.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
  /// Liquidity parameter (b). Higher = flatter price response.
  #[serde(default = "default_liquidity")]
  pub liquidity_parameter: f64,
  /// Opening YES price (bias), within [0.01, 0.99].
  #[serde(default = "default_initial_price")]
  pub initial_price_yes: f64,
  /// Open the market immediately instead of waiting for `open`.
  #[serde(default = "default_true")]
  pub open_on_start: bool,
}

/// Journal configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JournalConfig {
  /// Write a JSONL journal of session events.
  #[serde(default)]
  pub enabled: bool,
  /// Directory for journal files.
  #[serde(default = "default_data_dir")]
  pub data_dir: String,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable Prometheus metrics export.
  #[serde(default)]
  pub enabled: bool,
  /// Metrics server bind address.
  #[serde(default = "default_metrics_addr")]
  pub bind_address: String,
  /// Health check endpoint port.
  #[serde(default = "default_health_port")]
  pub health_port: u16,
}

impl Default for AppSection {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
      log_format: LogFormat::default(),
    }
  }
}

impl Default for MarketConfig {
  fn default() -> Self {
    Self {
      liquidity_parameter: default_liquidity(),
      initial_price_yes: default_initial_price(),
      open_on_start: true,
    }
  }
}

impl Default for JournalConfig {
  fn default() -> Self {
    Self {
      enabled: false,
      data_dir: default_data_dir(),
    }
  }
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: false,
      bind_address: default_metrics_addr(),
      health_port: default_health_port(),
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "lmsr-sim".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

const fn default_true() -> bool {
  true
}

const fn default_liquidity() -> f64 {
  10.0
}

const fn default_initial_price() -> f64 {
  0.5
}

fn default_data_dir() -> String {
  "data".to_string()
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}

const fn default_health_port() -> u16 {
  8080
}
