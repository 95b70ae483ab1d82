//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::AppConfig;
use crate::usecases::session::{MAX_INITIAL_PRICE, MIN_INITIAL_PRICE};

/// Path used when no config file is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)
    .with_context(|| format!("Invalid config file: {}", path.display()))?;

  info!(
    path = %path.display(),
    liquidity = config.market.liquidity_parameter,
    initial_price_yes = config.market.initial_price_yes,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Load `config.toml` if present, otherwise fall back to defaults.
///
/// # Errors
/// Fails only when the file exists but cannot be read or validated.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();
  if path.exists() {
    return load_config(path);
  }

  warn!(path = %path.display(), "Config file not found, using defaults");
  let config = AppConfig::default();
  validate_config(&config)?;
  Ok(config)
}

/// Parse and validate TOML text.
///
/// # Errors
/// TOML syntax errors and validation failures.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content)
    .context("Failed to parse config TOML")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  let market = &config.market;

  anyhow::ensure!(
    market.liquidity_parameter.is_finite() && market.liquidity_parameter > 0.0,
    "market.liquidity_parameter must be positive, got {}",
    market.liquidity_parameter
  );
  anyhow::ensure!(
    (MIN_INITIAL_PRICE..=MAX_INITIAL_PRICE).contains(&market.initial_price_yes),
    "market.initial_price_yes must be in [{}, {}], got {}",
    MIN_INITIAL_PRICE,
    MAX_INITIAL_PRICE,
    market.initial_price_yes
  );

  anyhow::ensure!(
    !config.journal.enabled || !config.journal.data_dir.is_empty(),
    "journal.data_dir must not be empty when the journal is enabled"
  );

  anyhow::ensure!(
    !config.metrics.enabled || !config.metrics.bind_address.is_empty(),
    "metrics.bind_address must not be empty when metrics are enabled"
  );
  anyhow::ensure!(
    config.metrics.health_port > 0,
    "metrics.health_port must be non-zero"
  );

  Ok(())
}
