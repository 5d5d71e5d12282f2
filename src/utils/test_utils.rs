use std::collections::VecDeque;
use std::ffi::{OsStr, OsString};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::api::{ActionArgs, ActionData, AgentResponse};
use crate::core::agent_client::{AgentClient, AgentError};

pub fn reply(message: &str) -> AgentResponse {
    AgentResponse {
        status: "success".to_string(),
        message: message.to_string(),
        data: None,
    }
}

pub fn reply_with_artifact(message: &str, project_name: &str, url: &str) -> AgentResponse {
    AgentResponse {
        status: "success".to_string(),
        message: message.to_string(),
        data: Some(ActionData {
            action: Some("scaffold_project".to_string()),
            action_args: Some(ActionArgs {
                project_name: Some(project_name.to_string()),
                ..Default::default()
            }),
            result: Some(serde_json::Value::String(url.to_string())),
            ..Default::default()
        }),
    }
}

/// Scripted stand-in for the agent. Replies are handed out in order; a
/// hanging client never answers so cancellation can be observed.
#[derive(Default)]
pub struct MockAgentClient {
    replies: Mutex<VecDeque<Result<AgentResponse, AgentError>>>,
    artifact: Mutex<Option<Result<Vec<u8>, AgentError>>>,
    queries: Mutex<Vec<String>>,
    hang: bool,
}

impl MockAgentClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub fn with_reply(self, reply: Result<AgentResponse, AgentError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_artifact(self, artifact: Result<Vec<u8>, AgentError>) -> Self {
        *self.artifact.lock().unwrap() = Some(artifact);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl AgentClient for MockAgentClient {
    async fn send_query(&self, query: &str) -> Result<AgentResponse, AgentError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Transport("no scripted reply".into())))
    }

    async fn fetch_artifact(&self, _location: &str) -> Result<Vec<u8>, AgentError> {
        self.artifact
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(AgentError::Transport("no scripted artifact".into())))
    }
}

/// A one-request HTTP server on localhost.
pub struct HttpStub {
    pub base_url: String,
    request_rx: oneshot::Receiver<String>,
}

impl HttpStub {
    /// The raw request the stub received (request line, headers and body).
    pub async fn request(self) -> String {
        self.request_rx.await.expect("stub should capture a request")
    }
}

pub async fn spawn_http_stub(status: &str, body: &str) -> HttpStub {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    let (request_tx, request_rx) = oneshot::channel();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    tokio::spawn(async move {
        let Ok((mut stream, _)) = listener.accept().await else {
            return;
        };
        let mut buffer = Vec::new();
        let mut chunk = [0_u8; 4096];
        loop {
            let read = match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(read) => read,
            };
            buffer.extend_from_slice(&chunk[..read]);
            if request_complete(&buffer) {
                break;
            }
        }
        let _ = request_tx.send(String::from_utf8_lossy(&buffer).into_owned());
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    });

    HttpStub {
        base_url: format!("http://{addr}"),
        request_rx,
    }
}

fn request_complete(buffer: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buffer);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    buffer.len() >= header_end + 4 + content_length
}

static ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Serializes environment mutation across tests and restores every touched
/// variable on drop.
pub struct TestEnvVarGuard {
    saved: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl TestEnvVarGuard {
    pub fn new() -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Self {
            saved: Vec::new(),
            _lock: lock,
        }
    }

    pub fn set_var(&mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) {
        self.remember(key.as_ref());
        std::env::set_var(key, value);
    }

    pub fn remove_var(&mut self, key: impl AsRef<OsStr>) {
        self.remember(key.as_ref());
        std::env::remove_var(key);
    }

    fn remember(&mut self, key: &OsStr) {
        if self.saved.iter().all(|(saved, _)| saved != key) {
            self.saved.push((key.to_os_string(), std::env::var_os(key)));
        }
    }
}

impl Drop for TestEnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..).rev() {
            match value {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }
}
