use super::{App, AppAction, AppCommand};

pub(super) fn handle_view_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::NoticeReceived(notice) => app.ui.push_notice(notice),
        AppAction::ScrollUp { lines } => app.ui.scroll_up(lines),
        AppAction::ScrollDown { lines } => app.ui.scroll_down(lines),
        AppAction::Resize { width } => {
            app.layout.observe_width(width);
        }
        AppAction::Quit => {
            app.turns.cancel();
            app.ui.exit_requested = true;
        }
        _ => {}
    }
    None
}
