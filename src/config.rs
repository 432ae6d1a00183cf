//! Configuration loading

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::async_impl::PumpConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub stream: StreamConfig,
    pub prediction: PredictionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            enable_cors: true,
        }
    }
}

/// Per-stream settings for `/api/simulate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub interval_ms: u64,
    pub max_ticks: u64,
    /// Used when `noise_level` is missing or not a finite number.
    pub default_noise: f64,
    /// Upper clamp for `noise_level`.
    pub max_noise: f64,
    /// Frames buffered between the pump and the HTTP body.
    pub buffer_frames: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            max_ticks: 60,
            default_noise: 0.5,
            max_noise: 5.0,
            buffer_frames: 16,
        }
    }
}

impl StreamConfig {
    pub fn pump_config(&self) -> PumpConfig {
        PumpConfig {
            interval: Duration::from_millis(self.interval_ms),
            max_ticks: self.max_ticks,
        }
    }

    /// Parses the raw `noise_level` query value and clamps it to `[0, max_noise]`.
    ///
    /// Never panics: a negative ceiling pins the result to 0 and a NaN
    /// ceiling is ignored.
    pub fn resolve_noise(&self, raw: Option<&str>) -> f64 {
        let requested = raw
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(self.default_noise);
        requested.min(self.max_noise).max(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub base_url: String,
    pub window_size: usize,
    pub timeout_secs: u64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            window_size: 10,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ServiceConfig {
    pub fn from_toml(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let stream = &self.stream;
        if !(stream.max_noise.is_finite() && stream.max_noise >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "stream.max_noise must be a non-negative number, got {}",
                stream.max_noise
            )));
        }
        if !(stream.default_noise.is_finite() && stream.default_noise >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "stream.default_noise must be a non-negative number, got {}",
                stream.default_noise
            )));
        }
        if self.prediction.window_size == 0 {
            return Err(ConfigError::Invalid(
                "prediction.window_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reads a TOML config file; `None` when the file does not exist.
pub fn read_config(path: impl AsRef<Path>) -> Result<Option<ServiceConfig>, ConfigError> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    match std::fs::read_to_string(path) {
        Ok(text) => ServiceConfig::from_toml(&text, &origin).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: origin,
            source,
        }),
    }
}

/// Reads a TOML config file. A missing file yields the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<ServiceConfig, ConfigError> {
    let path = path.as_ref();
    match read_config(path)? {
        Some(config) => Ok(config),
        None => {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(ServiceConfig::default())
        }
    }
}
