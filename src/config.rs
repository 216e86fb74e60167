//! Configuration file loading.
//!
//! The file is INI-style `key = value`. Section headers and `;`/`#` comments
//! are accepted and ignored; every key is global.

use log::warn;
use opclock_events::{SourceConfig, SourceKind};
use opclock_hw::HardwareConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.ini";
pub const CONFIG_ENV: &str = "OPCLOCK_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: invalid value {value:?} for `{key}` ({reason})")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
        reason: &'static str,
    },

    #[error("`{0}` is required for the configured event source")]
    MissingKey(&'static str),
}

/// Application configuration. Immutable once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub backlight_level: u8,
    pub event_source: SourceKind,
    pub event_source_file_filepath: Option<PathBuf>,
    pub event_source_http_url: Option<String>,
    pub event_source_http_interval: Duration,
    pub event_source_http_timeout: Duration,
    pub display_show_previous_expired_event: bool,
    pub backlight_device: Option<PathBuf>,
    pub touch_device: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backlight_level: 180,
            event_source: SourceKind::Http,
            event_source_file_filepath: None,
            event_source_http_url: None,
            event_source_http_interval: Duration::from_secs(60),
            event_source_http_timeout: Duration::from_secs(10),
            display_show_previous_expired_event: false,
            backlight_device: None,
            touch_device: None,
        }
    }
}

impl Config {
    /// Where to read the config from.
    /// `$OPCLOCK_CONFIG`, then `./config.ini`, then `<config dir>/opclock/config.ini`.
    pub fn locate() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return local;
        }

        dirs::config_dir()
            .map(|dir| dir.join("opclock").join(CONFIG_FILE))
            .filter(|path| path.exists())
            .unwrap_or(local)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate config file content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                warn!("config line {}: ignoring {:?}", idx + 1, line);
                continue;
            };
            config.apply(idx + 1, key.trim(), unquote(value.trim()))?;
        }

        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, line: usize, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: &'static str| ConfigError::InvalidValue {
            line,
            key: key.to_string(),
            value: value.to_string(),
            reason,
        };

        match key {
            "backlight_level" => {
                let level: i64 = value.parse().map_err(|_| invalid("not an integer"))?;
                self.backlight_level =
                    u8::try_from(level).map_err(|_| invalid("must be 0-255"))?;
            }
            "event_source" => {
                self.event_source = value
                    .parse()
                    .map_err(|_| invalid("expected DEMO, FILE or HTTP"))?;
            }
            "event_source_file_filepath" => {
                self.event_source_file_filepath = non_empty(value).map(PathBuf::from);
            }
            "event_source_http_url" => {
                self.event_source_http_url = non_empty(value).map(str::to_string);
            }
            "event_source_http_interval" => {
                self.event_source_http_interval = parse_seconds(value).ok_or_else(|| {
                    invalid("expected a whole number of seconds, at least 1")
                })?;
            }
            "event_source_http_timeout" => {
                self.event_source_http_timeout = parse_seconds(value).ok_or_else(|| {
                    invalid("expected a whole number of seconds, at least 1")
                })?;
            }
            "display_show_previous_expired_event" => {
                self.display_show_previous_expired_event =
                    parse_bool(value).ok_or_else(|| invalid("expected true or false"))?;
            }
            "backlight_device" => {
                self.backlight_device = non_empty(value).map(PathBuf::from);
            }
            "touch_device" => {
                self.touch_device = non_empty(value).map(PathBuf::from);
            }
            other => warn!("config line {}: unknown key `{}` ignored", line, other),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // FILE is rejected at source selection, with its own diagnostic
        if self.event_source == SourceKind::Http && self.event_source_http_url.is_none() {
            return Err(ConfigError::MissingKey("event_source_http_url"));
        }
        Ok(())
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            kind: self.event_source,
            file_path: self.event_source_file_filepath.clone(),
            http_url: self.event_source_http_url.clone(),
            http_interval: self.event_source_http_interval,
            http_timeout: self.event_source_http_timeout,
        }
    }

    pub fn hardware_config(&self) -> HardwareConfig {
        HardwareConfig {
            backlight_device: self.backlight_device.clone(),
            touch_device: self.touch_device.clone(),
        }
    }

    /// Lines for the startup banner.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![
            format!(" * Backlight Level: {}", self.backlight_level),
            format!(" * Event Source:    {}", self.event_source),
        ];
        match self.event_source {
            SourceKind::Demo => {}
            SourceKind::File => lines.push(format!(
                " * Event Filepath:  {}",
                self.event_source_file_filepath
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            )),
            SourceKind::Http => lines.push(format!(
                " * Event URL:       {}",
                self.event_source_http_url.as_deref().unwrap_or_default()
            )),
        }
        lines
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn parse_seconds(value: &str) -> Option<Duration> {
    value
        .parse::<u64>()
        .ok()
        .filter(|&secs| secs >= 1)
        .map(Duration::from_secs)
}
