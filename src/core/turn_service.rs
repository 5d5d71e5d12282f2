use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::AgentResponse;
use crate::core::agent_client::{AgentClient, AgentError};
use crate::core::download::{download_artifact, DownloadError, DownloadRequest};
use crate::core::turn::TurnRequest;

#[derive(Debug)]
pub enum AgentEvent {
    TurnFinished {
        turn_id: u64,
        result: Result<AgentResponse, AgentError>,
    },
    DownloadFinished(Result<PathBuf, DownloadError>),
}

/// Runs agent requests on the Tokio runtime and reports their results over
/// a channel the event loop drains.
#[derive(Clone)]
pub struct TurnService {
    client: Arc<dyn AgentClient>,
    tx: mpsc::UnboundedSender<AgentEvent>,
}

impl TurnService {
    pub fn new(client: Arc<dyn AgentClient>) -> (Self, mpsc::UnboundedReceiver<AgentEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { client, tx }, rx)
    }

    pub fn spawn_turn(&self, request: TurnRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let TurnRequest {
                turn_id,
                query,
                cancel_token,
            } = request;

            let result = tokio::select! {
                result = client.send_query(&query) => result,
                _ = cancel_token.cancelled() => Err(AgentError::Cancelled),
            };
            debug!(turn_id, ok = result.is_ok(), "turn request finished");
            let _ = tx.send(AgentEvent::TurnFinished { turn_id, result });
        });
    }

    pub fn spawn_download(&self, request: DownloadRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = download_artifact(client.as_ref(), &request).await;
            let _ = tx.send(AgentEvent::DownloadFinished(result));
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, event: AgentEvent) {
        let _ = self.tx.send(event);
    }
}
