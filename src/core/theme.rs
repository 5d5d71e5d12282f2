use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::config::{ConfigError, ConfigOrchestrator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme {other:?} (expected light or dark)")),
        }
    }
}

/// Current light/dark choice, remembered across sessions through the config
/// file. Without a backing file the choice only lasts for the session.
pub struct ThemeService {
    mode: ThemeMode,
    store: Option<Arc<ConfigOrchestrator>>,
}

impl ThemeService {
    pub fn new(mode: ThemeMode, store: Option<Arc<ConfigOrchestrator>>) -> Self {
        Self { mode, store }
    }

    pub fn in_memory(mode: ThemeMode) -> Self {
        Self::new(mode, None)
    }

    /// Start from the theme saved in `store`, falling back to light when the
    /// file cannot be read.
    pub fn load(store: Arc<ConfigOrchestrator>) -> Self {
        let mode = match store.load_with_cache() {
            Ok(config) => config.theme_mode(),
            Err(err) => {
                warn!(error = %err, "could not read saved theme");
                ThemeMode::default()
            }
        };
        Self::new(mode, Some(store))
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Flip the theme and persist it. The in-memory switch happens even if
    /// saving fails; the error is returned so the caller can report it.
    pub fn toggle(&mut self) -> Result<ThemeMode, ConfigError> {
        self.mode = self.mode.toggled();
        if let Some(store) = &self.store {
            let mode = self.mode;
            store.mutate(|config| config.theme = Some(mode))?;
        }
        Ok(self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use tempfile::TempDir;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!(" light ".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert!("solarized".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn toggle_flips_between_modes() {
        let mut theme = ThemeService::in_memory(ThemeMode::Light);
        assert_eq!(theme.toggle().expect("toggle"), ThemeMode::Dark);
        assert_eq!(theme.mode(), ThemeMode::Dark);
        assert_eq!(theme.toggle().expect("toggle"), ThemeMode::Light);
    }

    #[test]
    fn toggle_persists_across_sessions() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("config.toml");
        let store = Arc::new(ConfigOrchestrator::new(path.clone()));

        let mut theme = ThemeService::load(store.clone());
        assert_eq!(theme.mode(), ThemeMode::Light);
        theme.toggle().expect("toggle");

        let saved = Config::load_from_path(&path).expect("load");
        assert_eq!(saved.theme, Some(ThemeMode::Dark));

        let reopened = ThemeService::load(Arc::new(ConfigOrchestrator::new(path)));
        assert_eq!(reopened.mode(), ThemeMode::Dark);
    }

    #[test]
    fn unreadable_config_falls_back_to_light() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "theme = 7").expect("write");

        let theme = ThemeService::load(Arc::new(ConfigOrchestrator::new(path)));
        assert_eq!(theme.mode(), ThemeMode::Light);
    }
}
