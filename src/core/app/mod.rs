//! The explicit state object the event loop mutates and the renderer reads.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::config::data::path_display;
use crate::core::config::ConfigOrchestrator;
use crate::core::download::DownloadDetails;
use crate::core::layout::ResponsiveLayout;
use crate::core::menu::{options_menu, MenuItem};
use crate::core::message::Message;
use crate::core::notifications::Notifier;
use crate::core::theme::{ThemeMode, ThemeService};
use crate::core::turn::TurnController;
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

pub mod actions;
pub mod ui_state;


pub use actions::{apply_action, apply_actions, AppAction, AppCommand};
pub use ui_state::UiState;

/// Startup parameters for an interactive session.
pub struct AppInitConfig {
    pub base_url: String,
    pub log_file: Option<PathBuf>,
    pub download_dir: PathBuf,
    pub term_width: u16,
}

pub struct App {
    pub turns: TurnController,
    pub theme: ThemeService,
    pub layout: ResponsiveLayout,
    pub ui: UiState,
    pub logging: LoggingState,
    pub base_url: String,
    pub download_dir: PathBuf,
    config_store: Option<Arc<ConfigOrchestrator>>,
    notifier: Notifier,
}

impl App {
    pub fn new(
        init: AppInitConfig,
        theme: ThemeService,
        config_store: Option<Arc<ConfigOrchestrator>>,
        notifier: Notifier,
    ) -> Result<Self, Box<dyn Error>> {
        let logging = LoggingState::new(init.log_file)?;
        let ui = UiState::new(&Theme::for_mode(theme.mode()));

        Ok(Self {
            turns: TurnController::new(notifier.clone()),
            theme,
            layout: ResponsiveLayout::new(init.term_width),
            ui,
            logging,
            base_url: init.base_url,
            download_dir: init.download_dir,
            config_store,
            notifier,
        })
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.theme.mode()
    }

    pub fn current_theme(&self) -> Theme {
        Theme::for_mode(self.theme.mode())
    }

    pub fn menu_items(&self) -> Vec<MenuItem> {
        options_menu(self.theme.mode())
    }

    pub fn messages(&self) -> &[Message] {
        self.turns.conversation().messages()
    }

    pub fn download_details(&self) -> Option<&DownloadDetails> {
        self.turns.download_details()
    }

    pub fn is_pending(&self) -> bool {
        self.turns.is_pending()
    }

    /// One-line description of the active settings for the Settings entry.
    pub fn settings_summary(&self) -> String {
        let mut parts = vec![format!("agent: {}", self.base_url)];
        match &self.config_store {
            Some(store) => match store.load_with_cache() {
                Ok(config) => {
                    parts.extend(config.summary_lines());
                    parts.push(format!("file: {}", path_display(store.path())));
                }
                Err(err) => parts.push(format!("config unreadable: {err}")),
            },
            None => parts.push("config: not persisted".to_string()),
        }
        parts.push(format!("log: {}", self.logging.get_status_string()));
        parts.join(" · ")
    }
}
