//! Analysis configuration from environment variables

use std::env;

pub const DEFAULT_TAU_MINUTES: f64 = 30.0;
pub const DEFAULT_MAX_LAG_MINUTES: i64 = 720;
pub const DEFAULT_BIN_SIZE_MINUTES: f64 = 15.0;
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 7;

/// Tuning knobs for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Smoothing time constant in minutes. `tau <= 0` is accepted and
    /// means "no smoothing", not an error.
    pub tau_minutes: f64,
    /// Correlation lag window: lags swept over `[-max_lag, max_lag]`.
    pub max_lag_minutes: i64,
    /// Delay histogram bin width in minutes.
    pub bin_size_minutes: f64,
    /// Extra days of symptoms fetched past the query end so late meals can
    /// still find their next symptom.
    pub lookahead_days: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tau_minutes: DEFAULT_TAU_MINUTES,
            max_lag_minutes: DEFAULT_MAX_LAG_MINUTES,
            bin_size_minutes: DEFAULT_BIN_SIZE_MINUTES,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AnalysisConfig {
    /// Defaults overridden by any SYMFLOW_* variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(tau) = parse_env_f64("SYMFLOW_TAU_MINUTES")? {
            config.tau_minutes = tau;
        }
        if let Some(max_lag) = parse_env_i64("SYMFLOW_MAX_LAG_MINUTES")? {
            config.max_lag_minutes = max_lag;
        }
        if let Some(bin_size) = parse_env_f64("SYMFLOW_BIN_SIZE_MINUTES")? {
            config.bin_size_minutes = bin_size;
        }
        if let Some(lookahead) = parse_env_i64("SYMFLOW_LOOKAHEAD_DAYS")? {
            config.lookahead_days = lookahead;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lag_minutes <= 0 {
            return Err(ConfigError::InvalidValue(format!(
                "max lag must be positive minutes, got {}",
                self.max_lag_minutes
            )));
        }
        if self.bin_size_minutes <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "histogram bin size must be positive minutes, got {}",
                self.bin_size_minutes
            )));
        }
        if self.lookahead_days < 0 {
            return Err(ConfigError::InvalidValue(format!(
                "lookahead days cannot be negative, got {}",
                self.lookahead_days
            )));
        }
        Ok(())
    }
}

fn parse_env_f64(name: &str) -> Result<Option<f64>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<f64>().map(Some).map_err(|_| {
            ConfigError::InvalidValue(format!("{} must be a number, got '{}'", name, raw))
        }),
        Err(_) => Ok(None),
    }
}

fn parse_env_i64(name: &str) -> Result<Option<i64>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<i64>().map(Some).map_err(|_| {
            ConfigError::InvalidValue(format!("{} must be an integer, got '{}'", name, raw))
        }),
        Err(_) => Ok(None),
    }
}
