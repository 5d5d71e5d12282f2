use std::error::Error;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::core::constants::LOG_FILTER_ENV;
use crate::core::message::{Message, Sender};

const DEFAULT_TRACE_FILTER: &str = "warn";

/// Install the global `tracing` subscriber. The filter comes from
/// `DOKI_LOG` and defaults to `warn`. Output goes to `trace_file` when one
/// is given, which keeps diagnostics off the screen while the TUI owns it.
pub fn init_tracing(trace_file: Option<&Path>) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACE_FILTER));

    match trace_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init(),
    }
}

/// Plain-text transcript of the session, appended one message at a time.
pub struct LoggingState {
    file_path: Option<PathBuf>,
    is_active: bool,
}

impl LoggingState {
    pub fn new(log_file: Option<PathBuf>) -> Result<Self, Box<dyn Error>> {
        let mut logging = LoggingState {
            file_path: None,
            is_active: false,
        };
        if let Some(path) = log_file {
            logging.set_log_file(path)?;
        }
        Ok(logging)
    }

    pub fn set_log_file(&mut self, path: PathBuf) -> Result<String, Box<dyn Error>> {
        test_file_access(&path)?;

        let message = format!("Logging enabled to: {}", path.display());
        self.file_path = Some(path);
        self.is_active = true;
        Ok(message)
    }

    pub fn toggle_logging(&mut self) -> Result<String, Box<dyn Error>> {
        let Some(path) = self.file_path.clone() else {
            return Err(
                "No log file specified. Start doki with --log <file> to keep a transcript.".into(),
            );
        };

        if self.is_active {
            self.log_message("## Logging paused")?;
            self.is_active = false;
            Ok(format!("Logging paused (file: {})", path.display()))
        } else {
            self.is_active = true;
            self.log_message("## Logging resumed")?;
            Ok(format!("Logging resumed to: {}", path.display()))
        }
    }

    /// Append one conversation message. Empty assistant placeholders are
    /// skipped.
    pub fn log_conversation_message(&self, message: &Message) -> Result<(), Box<dyn Error>> {
        match message.sender {
            Sender::User => self.log_message(&format!("You: {}", message.text)),
            Sender::Ai if message.text.is_empty() => Ok(()),
            Sender::Ai => self.log_message(&format!("doki: {}", message.text)),
        }
    }

    pub fn log_message(&self, content: &str) -> Result<(), Box<dyn Error>> {
        match (&self.file_path, self.is_active) {
            (Some(path), true) => write_to_log(path, content),
            _ => Ok(()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn get_status_string(&self) -> String {
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!("active ({})", file_label(path)),
            (Some(path), false) => format!("paused ({})", file_label(path)),
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

fn write_to_log(path: &Path, content: &str) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);

    for line in content.lines() {
        writeln!(writer, "{line}")?;
    }
    // Blank line between messages, as on screen.
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn test_file_access(path: &Path) -> Result<(), Box<dyn Error>> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::MessageId;
    use std::fs;
    use tempfile::TempDir;

    fn message(sender: Sender, text: &str) -> Message {
        Message::new(MessageId(1), sender, text)
    }

    #[test]
    fn logging_is_disabled_without_a_file() {
        let mut logging = LoggingState::new(None).expect("logging");
        assert!(!logging.is_active());
        assert_eq!(logging.get_status_string(), "disabled");
        assert!(logging.toggle_logging().is_err());
        logging
            .log_message("nothing happens")
            .expect("inactive logging is a no-op");
    }

    #[test]
    fn conversation_messages_are_appended_with_spacing() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("session.log");
        let logging = LoggingState::new(Some(path.clone())).expect("logging");

        logging
            .log_conversation_message(&message(Sender::User, "Build a todo app"))
            .expect("log user");
        logging
            .log_conversation_message(&message(Sender::Ai, ""))
            .expect("skip placeholder");
        logging
            .log_conversation_message(&message(Sender::Ai, "Done.\nEnjoy!"))
            .expect("log reply");

        let contents = fs::read_to_string(&path).expect("read log");
        assert_eq!(contents, "You: Build a todo app\n\ndoki: Done.\nEnjoy!\n\n");
        assert_eq!(logging.get_status_string(), "active (session.log)");
    }

    #[test]
    fn paused_logging_writes_nothing_until_resumed() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("session.log");
        let mut logging = LoggingState::new(Some(path.clone())).expect("logging");

        let paused = logging.toggle_logging().expect("pause");
        assert!(paused.starts_with("Logging paused"));
        assert_eq!(logging.get_status_string(), "paused (session.log)");
        logging.log_message("hidden").expect("paused write");

        logging.toggle_logging().expect("resume");
        logging.log_message("visible").expect("write");

        let contents = fs::read_to_string(&path).expect("read log");
        assert!(contents.contains("## Logging paused"));
        assert!(!contents.contains("hidden"));
        assert!(contents.ends_with("## Logging resumed\n\nvisible\n\n"));
    }

    #[test]
    fn unwritable_log_path_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("missing").join("session.log");
        assert!(LoggingState::new(Some(path)).is_err());
    }
}
