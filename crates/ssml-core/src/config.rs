//! Configuration structures for the FX pipeline.

use crate::error::{FxError, FxResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration, usually loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FxConfig {
    /// External transform settings.
    #[serde(default)]
    pub transform: TransformConfig,

    /// Rendering defaults.
    #[serde(default)]
    pub render: RenderConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FxConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> FxResult<Self> {
        toml::from_str(text).map_err(|e| FxError::config(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> FxResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Apply `FFMPEG_BIN`, `FX_TIMEOUT_MS` and `FX_TEMP_DIR` from the environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(bin) = lookup("FFMPEG_BIN").filter(|s| !s.is_empty()) {
            self.transform.ffmpeg_bin = PathBuf::from(bin);
        }
        if let Some(ms) = lookup("FX_TIMEOUT_MS").and_then(|s| s.parse::<u64>().ok()) {
            self.transform.timeout_ms = ms;
        }
        if let Some(dir) = lookup("FX_TEMP_DIR").filter(|s| !s.is_empty()) {
            self.transform.temp_dir = Some(PathBuf::from(dir));
        }
        self
    }
}

/// External transform (ffmpeg) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Executable name or path.
    #[serde(default = "default_ffmpeg_bin")]
    pub ffmpeg_bin: PathBuf,
    /// Per-invocation timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Parent directory for per-call scratch directories.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

fn default_ffmpeg_bin() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: default_ffmpeg_bin(),
            timeout_ms: default_timeout_ms(),
            temp_dir: None,
        }
    }
}

/// Rendering defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Sample rate in Hz used when no source rate is known.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_sample_rate() -> u32 {
    24_000
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format (json or text).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = FxConfig::default();
        assert_eq!(config.transform.ffmpeg_bin, PathBuf::from("ffmpeg"));
        assert_eq!(config.transform.timeout_ms, 30_000);
        assert!(config.transform.temp_dir.is_none());
        assert_eq!(config.render.sample_rate, 24_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml() {
        let config = FxConfig::from_toml_str(
            r#"
            [transform]
            timeout_ms = 5000

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.transform.timeout_ms, 5000);
        assert_eq!(config.transform.ffmpeg_bin, PathBuf::from("ffmpeg"));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.render.sample_rate, 24_000);
    }

    #[test]
    fn test_invalid_toml() {
        let err = FxConfig::from_toml_str("[transform]\ntimeout_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, FxError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let config = FxConfig::default().with_overrides(|key| match key {
            "FFMPEG_BIN" => Some("/opt/ffmpeg/bin/ffmpeg".into()),
            "FX_TIMEOUT_MS" => Some("1234".into()),
            "FX_TEMP_DIR" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.transform.ffmpeg_bin, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.transform.timeout_ms, 1234);
        assert!(config.transform.temp_dir.is_none());
    }
}
