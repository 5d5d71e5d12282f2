mod sidebar;
mod turn;
mod view;

use super::App;
use crate::core::download::DownloadRequest;
use crate::core::notifications::Notice;
use crate::core::turn::TurnRequest;
use crate::core::turn_service::AgentEvent;

pub enum AppAction {
    SubmitInput,
    CancelTurn,
    AgentEvent(AgentEvent),
    RequestDownload,
    NoticeReceived(Notice),
    ToggleTheme,
    ToggleMenu,
    MenuMoveUp,
    MenuMoveDown,
    MenuActivate,
    ToggleLogging,
    ScrollUp { lines: u16 },
    ScrollDown { lines: u16 },
    Resize { width: u16 },
    Quit,
}

/// Work an action needs done off the event loop.
#[derive(Debug)]
pub enum AppCommand {
    SpawnTurn(TurnRequest),
    SpawnDownload(DownloadRequest),
}

pub fn apply_actions(
    app: &mut App,
    actions: impl IntoIterator<Item = AppAction>,
) -> Vec<AppCommand> {
    actions
        .into_iter()
        .filter_map(|action| apply_action(app, action))
        .collect()
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitInput
        | AppAction::CancelTurn
        | AppAction::AgentEvent(_)
        | AppAction::RequestDownload => turn::handle_turn_action(app, action),

        AppAction::ToggleTheme
        | AppAction::ToggleMenu
        | AppAction::MenuMoveUp
        | AppAction::MenuMoveDown
        | AppAction::MenuActivate
        | AppAction::ToggleLogging => sidebar::handle_sidebar_action(app, action),

        AppAction::NoticeReceived(_)
        | AppAction::ScrollUp { .. }
        | AppAction::ScrollDown { .. }
        | AppAction::Resize { .. }
        | AppAction::Quit => view::handle_view_action(app, action),
    }
}
