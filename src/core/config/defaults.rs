use std::path::PathBuf;
use std::time::Duration;

use crate::core::config::data::Config;
use crate::core::constants::{
    BASE_URL_ENV, BUILD_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, FALLBACK_BASE_URL,
};
use crate::core::theme::ThemeMode;
use crate::utils::url::normalize_base_url;

impl Config {
    /// The agent address, first match wins: command line, `DOKI_API_URL` at
    /// runtime, the config file, `DOKI_API_URL` at build time, localhost.
    pub fn effective_base_url(&self, cli_override: Option<&str>) -> String {
        let runtime_env = std::env::var(BASE_URL_ENV).ok();
        let url = [
            cli_override,
            runtime_env.as_deref(),
            self.base_url.as_deref(),
            BUILD_BASE_URL,
        ]
        .into_iter()
        .flatten()
        .map(normalize_base_url)
        .find(|url| !url.is_empty())
        .unwrap_or_else(|| FALLBACK_BASE_URL.to_string());
        url
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.theme.unwrap_or_default()
    }

    /// Downloads land in the configured directory, else the user's download
    /// folder, else the working directory.
    pub fn effective_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(|| directories::UserDirs::new()?.download_dir().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
