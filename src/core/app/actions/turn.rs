use tracing::{debug, warn};

use super::{App, AppAction, AppCommand};
use crate::api::AgentResponse;
use crate::core::agent_client::AgentError;
use crate::core::download::DownloadRequest;
use crate::core::turn::{SubmitOutcome, TurnOutcome};
use crate::core::turn_service::AgentEvent;

pub(super) fn handle_turn_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitInput => submit_input(app),
        AppAction::CancelTurn => {
            if !app.turns.cancel() {
                debug!("cancel requested with no turn in flight");
            }
            None
        }
        AppAction::AgentEvent(AgentEvent::TurnFinished { turn_id, result }) => {
            finish_turn(app, turn_id, result);
            None
        }
        AppAction::AgentEvent(AgentEvent::DownloadFinished(result)) => {
            match result {
                Ok(path) => app
                    .notifier()
                    .info(format!("Saved {}", path.display())),
                Err(err) => app.notifier().error(format!("Download failed: {err}")),
            }
            None
        }
        AppAction::RequestDownload => request_download(app),
        _ => None,
    }
}

fn submit_input(app: &mut App) -> Option<AppCommand> {
    let input = app.ui.input_text();
    match app.turns.submit(&input) {
        SubmitOutcome::Ignored | SubmitOutcome::Busy => None,
        SubmitOutcome::Started(request) => {
            app.ui.clear_input();
            app.ui.scroll_to_bottom();
            app.ui.begin_activity();

            let messages = app.turns.conversation().messages();
            if let Some(user_message) = messages.len().checked_sub(2).map(|i| &messages[i]) {
                if let Err(err) = app.logging.log_conversation_message(user_message) {
                    warn!(error = %err, "failed to write transcript");
                }
            }
            Some(AppCommand::SpawnTurn(request))
        }
    }
}

fn finish_turn(app: &mut App, turn_id: u64, result: Result<AgentResponse, AgentError>) {
    let outcome = app.turns.complete(turn_id, result);
    if let TurnOutcome::Replied { artifact_ready } = outcome {
        if let Some(reply) = app.turns.conversation().last() {
            if let Err(err) = app.logging.log_conversation_message(reply) {
                warn!(error = %err, "failed to write transcript");
            }
        }
        app.ui.scroll_to_bottom();
        if artifact_ready {
            app.notifier()
                .info("Your project is ready! Press Ctrl+D to download it.");
        }
    }
}

fn request_download(app: &mut App) -> Option<AppCommand> {
    let Some(details) = app.download_details().cloned() else {
        app.notifier().info("No project is ready to download yet.");
        return None;
    };

    app.notifier()
        .info(format!("Downloading {}…", details.file_name()));
    Some(AppCommand::SpawnDownload(DownloadRequest {
        details,
        target_dir: app.download_dir.clone(),
    }))
}
