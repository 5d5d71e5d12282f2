use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::theme::ThemeMode;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address of the agent, e.g. "http://localhost:8000"
    pub base_url: Option<String>,
    /// Last theme chosen in the UI ("light" or "dark")
    pub theme: Option<ThemeMode>,
    /// Where downloaded project archives are written
    pub download_dir: Option<PathBuf>,
    /// Upper bound on how long a chat turn may take, in seconds
    pub request_timeout_secs: Option<u64>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/doki/config.toml` → `~/.config/doki/config.toml`
/// - Windows: paths are shown unchanged
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
