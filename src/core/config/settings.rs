//! `doki set` / `doki unset` key handling.

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::config::data::Config;
use crate::core::theme::ThemeMode;
use crate::utils::url::validate_base_url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    BaseUrl,
    Theme,
    DownloadDir,
    RequestTimeout,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::BaseUrl,
        ConfigKey::Theme,
        ConfigKey::DownloadDir,
        ConfigKey::RequestTimeout,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::Theme => "theme",
            ConfigKey::DownloadDir => "download-dir",
            ConfigKey::RequestTimeout => "request-timeout",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| SettingError::UnknownKey(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    UnknownKey(String),
    InvalidValue { key: ConfigKey, reason: String },
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => {
                let known: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.as_str()).collect();
                write!(
                    f,
                    "Unknown config key: {key} (expected one of: {})",
                    known.join(", ")
                )
            }
            SettingError::InvalidValue { key, reason } => {
                write!(f, "Invalid value for {key}: {reason}")
            }
        }
    }
}

impl StdError for SettingError {}

impl Config {
    /// Apply `doki set <key> <value>`. Returns the value as stored.
    pub fn set_value(&mut self, key: ConfigKey, value: &str) -> Result<String, SettingError> {
        let value = value.trim();
        let invalid = |reason: String| SettingError::InvalidValue { key, reason };
        match key {
            ConfigKey::BaseUrl => {
                let url = validate_base_url(value).map_err(invalid)?;
                self.base_url = Some(url.clone());
                Ok(url)
            }
            ConfigKey::Theme => {
                let mode = value.parse::<ThemeMode>().map_err(invalid)?;
                self.theme = Some(mode);
                Ok(mode.to_string())
            }
            ConfigKey::DownloadDir => {
                if value.is_empty() {
                    return Err(invalid("path must not be empty".into()));
                }
                self.download_dir = Some(PathBuf::from(value));
                Ok(value.to_string())
            }
            ConfigKey::RequestTimeout => {
                let secs = value
                    .parse::<u64>()
                    .map_err(|e| invalid(format!("{value:?} is not a number of seconds: {e}")))?;
                self.request_timeout_secs = Some(secs);
                Ok(secs.to_string())
            }
        }
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::BaseUrl => self.base_url = None,
            ConfigKey::Theme => self.theme = None,
            ConfigKey::DownloadDir => self.download_dir = None,
            ConfigKey::RequestTimeout => self.request_timeout_secs = None,
        }
    }
}
