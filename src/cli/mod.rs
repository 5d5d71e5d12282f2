//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;


use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::say::run_say;
use crate::core::config::settings::{ConfigKey, SettingError};
use crate::core::config::{ConfigError, ConfigOrchestrator};
use crate::ui::chat_loop::{run_chat, ChatOptions};
use crate::utils::logging::init_tracing;

#[derive(Parser)]
#[command(name = "doki", version)]
#[command(about = "A terminal chat client for the doki project-building agent")]
#[command(
    long_about = "doki sends your requests to the doki agent and shows its replies in a \
full-screen terminal chat. When the agent finishes building a project, the archive can be \
downloaded straight from the chat.\n\n\
Environment Variables:\n\
  DOKI_API_URL      Agent base URL (overrides the config file)\n\
  DOKI_CONFIG_DIR   Directory holding config.toml\n\
  DOKI_LOG          Diagnostic filter, e.g. doki=debug (use with --trace-file)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a new line\n\
  Esc               Stop waiting for the current reply\n\
  Ctrl+D            Download the finished project\n\
  Ctrl+T            Toggle light/dark theme\n\
  Ctrl+O            Open the options menu\n\
  Ctrl+L            Pause or resume the transcript log\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Agent base URL for this run
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Append a transcript of the chat to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub trace_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message without the chat interface and print the reply
    Say {
        /// Save the finished project archive if the agent produces one
        #[arg(short = 'd', long)]
        download: bool,
        /// The message to send
        #[arg(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,
    },
    /// Set configuration values, or show them when no value is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);

    // The chat screen owns the terminal, so its diagnostics only go to a file.
    match (&command, args.trace_file.as_deref()) {
        (Commands::Chat, None) => {}
        (_, target) => {
            if let Err(err) = init_tracing(target) {
                eprintln!("⚠️  Could not start diagnostics: {err}");
            }
        }
    }

    match command {
        Commands::Chat => {
            run_chat(ChatOptions {
                base_url: args.base_url,
                log_file: args.log,
            })
            .await
        }
        Commands::Say { download, prompt } => run_say(prompt, args.base_url, download).await,
        Commands::Set { key, value } => {
            let store = ConfigOrchestrator::from_default_path()?;
            let Some(key) = key else {
                store.load_with_cache()?.print_all();
                return Ok(());
            };
            match set_config_value(&store, &key, &value) {
                Ok(Some(message)) => println!("✅ {message}"),
                Ok(None) => store.load_with_cache()?.print_all(),
                Err(err) => exit_with_config_error(err),
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let store = ConfigOrchestrator::from_default_path()?;
            match unset_config_value(&store, &key) {
                Ok(message) => println!("✅ {message}"),
                Err(err) => exit_with_config_error(err),
            }
            Ok(())
        }
    }
}

#[derive(Debug)]
pub(crate) enum ConfigCommandError {
    Setting(SettingError),
    Config(ConfigError),
}

impl std::fmt::Display for ConfigCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigCommandError::Setting(err) => write!(f, "{err}"),
            ConfigCommandError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigCommandError {}

impl From<SettingError> for ConfigCommandError {
    fn from(err: SettingError) -> Self {
        ConfigCommandError::Setting(err)
    }
}

impl From<ConfigError> for ConfigCommandError {
    fn from(err: ConfigError) -> Self {
        ConfigCommandError::Config(err)
    }
}

fn exit_with_config_error(err: ConfigCommandError) -> ! {
    eprintln!("❌ {err}");
    std::process::exit(1);
}

/// `doki set <key> <value…>`. Returns `None` when no value was given, in
/// which case the caller shows the current configuration.
pub(crate) fn set_config_value(
    store: &ConfigOrchestrator,
    key: &str,
    value: &[String],
) -> Result<Option<String>, ConfigCommandError> {
    if value.is_empty() {
        return Ok(None);
    }
    let key: ConfigKey = key.parse()?;
    let mut config = store.load_with_cache()?;
    let stored = config.set_value(key, &value.join(" "))?;
    store.mutate(|current| *current = config)?;
    Ok(Some(format!("Set {key} to: {stored}")))
}

pub(crate) fn unset_config_value(
    store: &ConfigOrchestrator,
    key: &str,
) -> Result<String, ConfigCommandError> {
    let key: ConfigKey = key.parse()?;
    store.mutate(|config| config.unset_value(key))?;
    Ok(format!("Unset {key}"))
}
