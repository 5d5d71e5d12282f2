//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::agent_client::{AgentClient, HttpAgentClient};
use crate::core::config::data::Config;
use crate::core::download::DownloadRequest;
use crate::core::notifications::{Notice, Notifier};
use crate::core::turn::{SubmitOutcome, TurnController, TurnOutcome};
use crate::core::turn_service::{AgentEvent, TurnService};
use crate::utils::url::validate_base_url;

pub async fn run_say(
    prompt: Vec<String>,
    base_url: Option<String>,
    download: bool,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: doki say <prompt>");
        std::process::exit(1);
    }

    let config = Config::load()?;
    let base_url = validate_base_url(&config.effective_base_url(base_url.as_deref()))?;
    let client: Arc<dyn AgentClient> =
        Arc::new(HttpAgentClient::new(&base_url, config.request_timeout()));
    let download_dir = download.then(|| config.effective_download_dir());

    let succeeded = say(
        client,
        &prompt,
        download_dir,
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .await?;
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

/// Run one turn to completion, printing the reply to `out` and notices to
/// `err_out`. Returns false when the turn or the requested download failed.
pub(crate) async fn say<W, E>(
    client: Arc<dyn AgentClient>,
    prompt: &str,
    download_dir: Option<PathBuf>,
    out: &mut W,
    err_out: &mut E,
) -> Result<bool, Box<dyn Error>>
where
    W: Write,
    E: Write,
{
    let (notifier, mut notice_rx) = Notifier::new();
    let mut controller = TurnController::new(notifier);
    let request = match controller.submit(prompt) {
        SubmitOutcome::Started(request) => request,
        SubmitOutcome::Ignored | SubmitOutcome::Busy => return Ok(false),
    };

    let (service, mut events) = TurnService::new(client);
    service.spawn_turn(request);

    let outcome = loop {
        match events.recv().await {
            Some(AgentEvent::TurnFinished { turn_id, result }) => {
                break controller.complete(turn_id, result)
            }
            Some(AgentEvent::DownloadFinished(_)) => continue,
            None => return Err("agent task ended without a reply".into()),
        }
    };
    print_notices(&mut notice_rx, err_out)?;

    let TurnOutcome::Replied { artifact_ready } = outcome else {
        return Ok(false);
    };
    if let Some(reply) = controller.conversation().last() {
        writeln!(out, "{}", reply.text)?;
    }

    let Some(details) = controller.download_details().cloned().filter(|_| artifact_ready) else {
        return Ok(true);
    };
    let Some(target_dir) = download_dir else {
        writeln!(
            err_out,
            "Your project is ready: {} (run again with --download to save it)",
            details.url
        )?;
        return Ok(true);
    };

    service.spawn_download(DownloadRequest {
        details,
        target_dir,
    });
    loop {
        match events.recv().await {
            Some(AgentEvent::DownloadFinished(Ok(path))) => {
                writeln!(err_out, "Saved {}", path.display())?;
                return Ok(true);
            }
            Some(AgentEvent::DownloadFinished(Err(err))) => {
                writeln!(err_out, "Download failed: {err}")?;
                return Ok(false);
            }
            Some(AgentEvent::TurnFinished { .. }) => continue,
            None => return Err("download task ended without a result".into()),
        }
    }
}

fn print_notices<E: Write>(
    notice_rx: &mut tokio::sync::mpsc::UnboundedReceiver<Notice>,
    err_out: &mut E,
) -> io::Result<()> {
    while let Ok(notice) = notice_rx.try_recv() {
        writeln!(err_out, "{}", notice.text)?;
    }
    Ok(())
}
