//! Lifecycle of a single chat turn.
//!
//! A turn starts when [`TurnController::submit`] appends the user's message
//! and an empty assistant placeholder, and ends in exactly one of three ways:
//! the reply arrives and replaces the placeholder, the user cancels, or the
//! request fails and one error notice is raised. Only one turn may be in
//! flight; the controller owns its cancellation token and drops it on every
//! exit path.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::api::AgentResponse;
use crate::core::agent_client::AgentError;
use crate::core::conversation::{ConversationStore, ReconcileError};
use crate::core::download::DownloadDetails;
use crate::core::notifications::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Pending,
}

/// Everything needed to dispatch the network call for a started turn.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub turn_id: u64,
    pub query: String,
    pub cancel_token: CancellationToken,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// A turn is already in flight; nothing happened.
    Busy,
    Started(TurnRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Replied { artifact_ready: bool },
    Cancelled,
    Failed(AgentError),
    /// The placeholder could not be reconciled; the reply was dropped.
    Aborted(ReconcileError),
    /// The result belongs to a turn that is no longer active.
    Stale,
}

#[derive(Debug)]
struct ActiveTurn {
    turn_id: u64,
    cancel_token: CancellationToken,
}

pub struct TurnController {
    conversation: ConversationStore,
    download: Option<DownloadDetails>,
    active: Option<ActiveTurn>,
    last_turn_id: u64,
    notifier: Notifier,
}

impl TurnController {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            conversation: ConversationStore::new(),
            download: None,
            active: None,
            last_turn_id: 0,
            notifier,
        }
    }

    pub fn submit(&mut self, input: &str) -> SubmitOutcome {
        if input.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }
        if let Some(active) = &self.active {
            debug!(turn_id = active.turn_id, "rejecting submit while a turn is pending");
            return SubmitOutcome::Busy;
        }
        if !self.conversation.append_turn(input) {
            return SubmitOutcome::Ignored;
        }

        self.last_turn_id += 1;
        let turn_id = self.last_turn_id;
        let cancel_token = CancellationToken::new();
        self.active = Some(ActiveTurn {
            turn_id,
            cancel_token: cancel_token.clone(),
        });
        let query = self
            .conversation
            .last_user_text()
            .unwrap_or(input)
            .to_string();
        info!(turn_id, "turn started");

        SubmitOutcome::Started(TurnRequest {
            turn_id,
            query,
            cancel_token,
        })
    }

    /// Abort the in-flight turn. The placeholder stays as it is and no
    /// notice is raised. Returns false when nothing was pending.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(turn) => {
                turn.cancel_token.cancel();
                info!(turn_id = turn.turn_id, "turn cancelled");
                true
            }
            None => false,
        }
    }

    pub fn complete(
        &mut self,
        turn_id: u64,
        result: Result<AgentResponse, AgentError>,
    ) -> TurnOutcome {
        if self.active_turn_id() != Some(turn_id) {
            debug!(turn_id, "ignoring result for inactive turn");
            return TurnOutcome::Stale;
        }
        self.active = None;

        match result {
            Ok(response) => {
                debug!(turn_id, status = %response.status, "reply received");
                let artifact = DownloadDetails::from_response(&response);
                if let Err(err) = self.conversation.reconcile_last_assistant(response.message) {
                    error!(
                        turn_id,
                        error = %err,
                        "conversation out of step with turn; dropping reply"
                    );
                    return TurnOutcome::Aborted(err);
                }

                let artifact_ready = artifact.is_some();
                if let Some(details) = artifact {
                    info!(turn_id, project = %details.project_name, "artifact ready");
                    self.download = Some(details);
                }
                TurnOutcome::Replied { artifact_ready }
            }
            Err(AgentError::Cancelled) => {
                debug!(turn_id, "turn ended by cancellation");
                TurnOutcome::Cancelled
            }
            Err(err) => {
                warn!(turn_id, error = %err, "turn failed");
                self.notifier.error(format!("An error occurred: {err}"));
                TurnOutcome::Failed(err)
            }
        }
    }

    pub fn phase(&self) -> TurnPhase {
        if self.active.is_some() {
            TurnPhase::Pending
        } else {
            TurnPhase::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        self.phase() == TurnPhase::Pending
    }

    pub fn active_turn_id(&self) -> Option<u64> {
        self.active.as_ref().map(|turn| turn.turn_id)
    }

    pub fn has_cancel_token(&self) -> bool {
        self.active.is_some()
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn download_details(&self) -> Option<&DownloadDetails> {
        self.download.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn conversation_mut(&mut self) -> &mut ConversationStore {
        &mut self.conversation
    }
}

impl Drop for TurnController {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Sender;
    use crate::core::notifications::Notice;
    use crate::utils::test_utils::{reply, reply_with_artifact};
    use tokio::sync::mpsc::UnboundedReceiver;

    fn controller() -> (TurnController, UnboundedReceiver<Notice>) {
        let (notifier, rx) = Notifier::new();
        (TurnController::new(notifier), rx)
    }

    fn start(controller: &mut TurnController, input: &str) -> TurnRequest {
        match controller.submit(input) {
            SubmitOutcome::Started(request) => request,
            other => panic!("expected turn to start, got {other:?}"),
        }
    }

    #[test]
    fn submit_appends_optimistic_pair_and_goes_pending() {
        let (mut controller, _rx) = controller();
        let request = start(&mut controller, "Make me a react app");

        assert_eq!(request.query, "Make me a react app");
        assert!(!request.cancel_token.is_cancelled());
        assert_eq!(controller.phase(), TurnPhase::Pending);
        assert_eq!(controller.active_turn_id(), Some(request.turn_id));

        let messages = controller.conversation().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert!(messages[1].is_placeholder());
    }

    #[test]
    fn blank_submit_is_ignored() {
        let (mut controller, mut rx) = controller();
        assert!(matches!(controller.submit("   \n"), SubmitOutcome::Ignored));
        assert!(controller.conversation().is_empty());
        assert_eq!(controller.phase(), TurnPhase::Idle);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn second_submit_while_pending_is_rejected() {
        let (mut controller, mut rx) = controller();
        let first = start(&mut controller, "first");

        assert!(matches!(controller.submit("second"), SubmitOutcome::Busy));
        assert_eq!(controller.conversation().len(), 2);
        assert_eq!(controller.active_turn_id(), Some(first.turn_id));
        assert!(!first.cancel_token.is_cancelled());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn successful_reply_reconciles_placeholder() {
        let (mut controller, mut rx) = controller();
        let request = start(&mut controller, "Hi");
        let len_after_submit = controller.conversation().len();

        let outcome = controller.complete(request.turn_id, Ok(reply("Hello")));
        assert_eq!(
            outcome,
            TurnOutcome::Replied {
                artifact_ready: false
            }
        );

        let last = controller.conversation().last().expect("last");
        assert_eq!(last.sender, Sender::Ai);
        assert_eq!(last.text, "Hello");
        assert_eq!(controller.conversation().len(), len_after_submit);
        assert_eq!(controller.phase(), TurnPhase::Idle);
        assert!(!controller.has_cancel_token());
        assert!(controller.download_details().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn artifact_reply_sets_download_details() {
        let (mut controller, _rx) = controller();
        let request = start(&mut controller, "scaffold demo");

        let outcome = controller.complete(
            request.turn_id,
            Ok(reply_with_artifact("Done", "demo", "https://x/y.zip")),
        );
        assert_eq!(
            outcome,
            TurnOutcome::Replied {
                artifact_ready: true
            }
        );
        assert_eq!(
            controller.download_details(),
            Some(&DownloadDetails {
                project_name: "demo".into(),
                url: "https://x/y.zip".into(),
            })
        );

        let request = start(&mut controller, "thanks");
        controller.complete(request.turn_id, Ok(reply("You're welcome")));
        assert_eq!(
            controller.download_details().map(|d| d.project_name.as_str()),
            Some("demo")
        );
    }

    #[test]
    fn cancel_clears_token_without_notice() {
        let (mut controller, mut rx) = controller();
        let request = start(&mut controller, "long job");
        let len_after_submit = controller.conversation().len();

        assert!(controller.cancel());
        assert!(request.cancel_token.is_cancelled());
        assert!(!controller.has_cancel_token());
        assert_eq!(controller.phase(), TurnPhase::Idle);
        assert_eq!(controller.conversation().len(), len_after_submit);
        assert!(controller
            .conversation()
            .last()
            .expect("placeholder")
            .is_placeholder());

        let late = controller.complete(request.turn_id, Err(AgentError::Cancelled));
        assert_eq!(late, TurnOutcome::Stale);
        assert!(rx.try_recv().is_err());
        assert!(!controller.cancel());
    }

    #[test]
    fn transport_failure_emits_exactly_one_notice() {
        let (mut controller, mut rx) = controller();
        let request = start(&mut controller, "Hi");

        let outcome = controller.complete(
            request.turn_id,
            Err(AgentError::Transport("connection refused".into())),
        );
        assert!(matches!(outcome, TurnOutcome::Failed(AgentError::Transport(_))));

        let notice = rx.try_recv().expect("error notice");
        assert!(notice.is_error());
        assert_eq!(
            notice.text,
            "An error occurred: request failed: connection refused"
        );
        assert!(rx.try_recv().is_err());

        assert_eq!(controller.phase(), TurnPhase::Idle);
        assert!(!controller.has_cancel_token());
        assert_eq!(controller.conversation().last().expect("last").text, "");
    }

    #[test]
    fn parse_and_status_failures_are_reported_like_transport() {
        let (mut controller, mut rx) = controller();
        for err in [
            AgentError::Parse("missing field `message`".into()),
            AgentError::HttpStatus {
                status: 502,
                summary: "Bad Gateway".into(),
            },
        ] {
            let request = start(&mut controller, "Hi");
            assert!(matches!(
                controller.complete(request.turn_id, Err(err)),
                TurnOutcome::Failed(_)
            ));
            assert!(rx.try_recv().expect("notice").is_error());
            assert!(rx.try_recv().is_err());
        }
        assert_eq!(controller.conversation().len(), 4);
    }

    #[test]
    fn cancelled_result_for_active_turn_is_silent() {
        let (mut controller, mut rx) = controller();
        let request = start(&mut controller, "Hi");

        let outcome = controller.complete(request.turn_id, Err(AgentError::Cancelled));
        assert_eq!(outcome, TurnOutcome::Cancelled);
        assert_eq!(controller.phase(), TurnPhase::Idle);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn stale_results_change_nothing() {
        let (mut controller, mut rx) = controller();
        let first = start(&mut controller, "first");
        controller.cancel();
        let second = start(&mut controller, "second");

        assert_eq!(
            controller.complete(first.turn_id, Ok(reply("late"))),
            TurnOutcome::Stale
        );
        assert_eq!(controller.active_turn_id(), Some(second.turn_id));
        assert!(controller
            .conversation()
            .last()
            .expect("placeholder")
            .is_placeholder());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn reconcile_failure_aborts_turn() {
        let (mut controller, mut rx) = controller();
        let request = start(&mut controller, "Hi");
        controller
            .conversation_mut()
            .push_for_test(Sender::User, "corrupted");

        let outcome = controller.complete(request.turn_id, Ok(reply("Hello")));
        assert!(matches!(
            outcome,
            TurnOutcome::Aborted(ReconcileError::NotAssistant { .. })
        ));
        assert_eq!(controller.phase(), TurnPhase::Idle);
        assert!(!controller.has_cancel_token());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropping_controller_cancels_in_flight_turn() {
        let (mut controller, _rx) = controller();
        let request = start(&mut controller, "Hi");
        drop(controller);
        assert!(request.cancel_token.is_cancelled());
    }
}
