use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::crossterm::event::{self, Event};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::keybindings::handle_event;
use super::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::core::agent_client::{AgentClient, HttpAgentClient};
use crate::core::app::{apply_action, apply_actions, App, AppAction, AppCommand, AppInitConfig};
use crate::core::config::{Config, ConfigOrchestrator};
use crate::core::notifications::{Notice, Notifier};
use crate::core::theme::ThemeService;
use crate::core::turn_service::{AgentEvent, TurnService};
use crate::ui::renderer::ui;
use crate::utils::url::validate_base_url;

const MAX_FPS: u64 = 60;

pub enum UiEvent {
    Crossterm(Event),
}

/// Options the command line passes to an interactive session.
#[derive(Debug, Default, Clone)]
pub struct ChatOptions {
    pub base_url: Option<String>,
    pub log_file: Option<PathBuf>,
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

pub fn execute_command(service: &TurnService, command: AppCommand) {
    match command {
        AppCommand::SpawnTurn(request) => service.spawn_turn(request),
        AppCommand::SpawnDownload(request) => service.spawn_download(request),
    }
}

/// Applies every pending agent result, then the notices those results (or
/// earlier actions) raised. Returns true when anything arrived.
pub fn process_background_updates(
    app: &mut App,
    service: &TurnService,
    agent_rx: &mut mpsc::UnboundedReceiver<AgentEvent>,
    notice_rx: &mut mpsc::UnboundedReceiver<Notice>,
) -> bool {
    let mut actions = Vec::new();
    while let Ok(event) = agent_rx.try_recv() {
        actions.push(AppAction::AgentEvent(event));
    }
    let mut received_any = !actions.is_empty();
    for command in apply_actions(app, actions) {
        execute_command(service, command);
    }

    while let Ok(notice) = notice_rx.try_recv() {
        received_any = true;
        apply_action(app, AppAction::NoticeReceived(notice));
    }
    received_any
}

fn load_config_store() -> Result<(Option<Arc<ConfigOrchestrator>>, Config), Box<dyn Error>> {
    match ConfigOrchestrator::from_default_path() {
        Ok(store) => {
            let config = store.load_with_cache()?;
            Ok((Some(Arc::new(store)), config))
        }
        Err(err) => {
            warn!(error = %err, "no config directory; settings will not persist");
            Ok((None, Config::default()))
        }
    }
}

pub async fn run_chat(options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let (store, config) = load_config_store()?;
    let base_url = validate_base_url(&config.effective_base_url(options.base_url.as_deref()))?;
    info!(%base_url, "starting chat session");

    let client: Arc<dyn AgentClient> =
        Arc::new(HttpAgentClient::new(&base_url, config.request_timeout()));
    let theme = match &store {
        Some(store) => ThemeService::load(store.clone()),
        None => ThemeService::in_memory(config.theme_mode()),
    };
    let (term_width, _) = ratatui::crossterm::terminal::size().unwrap_or((120, 40));

    let (notifier, mut notice_rx) = Notifier::new();
    let mut app = App::new(
        AppInitConfig {
            base_url,
            log_file: options.log_file,
            download_dir: config.effective_download_dir(),
            term_width,
        },
        theme,
        store,
        notifier,
    )?;

    let (turn_service, mut agent_rx) = TurnService::new(client);
    let mut terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let result = main_loop(
        &mut app,
        &mut terminal,
        &turn_service,
        &mut event_rx,
        &mut agent_rx,
        &mut notice_rx,
    )
    .await;

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;
    result
}

async fn main_loop(
    app: &mut App,
    terminal: &mut ChatTerminal,
    turn_service: &TurnService,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    agent_rx: &mut mpsc::UnboundedReceiver<AgentEvent>,
    notice_rx: &mut mpsc::UnboundedReceiver<Notice>,
) -> Result<(), Box<dyn Error>> {
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut request_redraw = true;
    let mut last_draw = Instant::now() - frame_duration;

    loop {
        if app.ui.exit_requested {
            return Ok(());
        }

        // Keep the activity indicator moving while a turn is in flight.
        if app.is_pending() && last_draw.elapsed() >= frame_duration {
            request_redraw = true;
        }
        if request_redraw {
            terminal.draw(|f| ui(f, app))?;
            request_redraw = false;
            last_draw = Instant::now();
        }

        let term_height = terminal.size()?.height;
        let mut actions = Vec::new();
        let mut events_processed = false;
        while let Ok(UiEvent::Crossterm(event)) = event_rx.try_recv() {
            events_processed = true;
            actions.extend(handle_event(app, event, term_height));
        }
        for command in apply_actions(app, actions) {
            execute_command(turn_service, command);
        }

        let received_any = process_background_updates(app, turn_service, agent_rx, notice_rx);

        if events_processed || received_any {
            request_redraw = true;
        } else {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    }
}
