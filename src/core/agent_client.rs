//! HTTP access to the doki agent.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::api::{AgentResponse, ChatRequest};
use crate::core::constants::{CHAT_ENDPOINT, MAX_ARTIFACT_BYTES};
use crate::utils::url::{construct_api_url, normalize_base_url, resolve_artifact_url};

/// Ways a request to the agent can end without a usable reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// The request never produced a response (connection, DNS, timeout).
    Transport(String),
    /// The agent answered with a non-2xx status.
    HttpStatus { status: u16, summary: String },
    /// The body did not have the expected shape.
    Parse(String),
    /// A downloaded artifact grew past the size cap.
    TooLarge { limit: usize },
    /// The user stopped the request.
    Cancelled,
}

impl AgentError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AgentError::Cancelled)
    }
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Transport(message) => write!(f, "request failed: {message}"),
            AgentError::HttpStatus { status, summary } => {
                write!(f, "agent returned HTTP {status}: {summary}")
            }
            AgentError::Parse(message) => write!(f, "unexpected response from agent: {message}"),
            AgentError::TooLarge { limit } => write!(f, "artifact is larger than {limit} bytes"),
            AgentError::Cancelled => write!(f, "request cancelled"),
        }
    }
}

impl StdError for AgentError {}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AgentError::Parse(err.to_string())
        } else {
            AgentError::Transport(err.to_string())
        }
    }
}

#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Send one chat turn and wait for the agent's reply.
    async fn send_query(&self, query: &str) -> Result<AgentResponse, AgentError>;

    /// Retrieve the artifact at `location` (an absolute URL or a path on the
    /// agent).
    async fn fetch_artifact(&self, location: &str) -> Result<Vec<u8>, AgentError>;
}

#[derive(Clone)]
pub struct HttpAgentClient {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Option<Duration>,
    max_artifact_bytes: usize,
}

impl HttpAgentClient {
    pub fn new(base_url: &str, request_timeout: Option<Duration>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize_base_url(base_url),
            request_timeout,
            max_artifact_bytes: MAX_ARTIFACT_BYTES,
        }
    }

    /// Cap on the size of a downloaded artifact.
    pub fn with_max_artifact_bytes(mut self, limit: usize) -> Self {
        self.max_artifact_bytes = limit;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn send_query(&self, query: &str) -> Result<AgentResponse, AgentError> {
        let chat_url = construct_api_url(&self.base_url, CHAT_ENDPOINT);
        debug!(url = %chat_url, query_len = query.len(), "sending chat turn");

        let mut request = self
            .client
            .post(&chat_url)
            .header(CONTENT_TYPE, "application/json")
            .json(&ChatRequest {
                query: query.to_string(),
            });
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AgentError::HttpStatus {
                status: status.as_u16(),
                summary: summarize_error_body(&body),
            });
        }

        serde_json::from_str::<AgentResponse>(&body).map_err(|e| AgentError::Parse(e.to_string()))
    }

    async fn fetch_artifact(&self, location: &str) -> Result<Vec<u8>, AgentError> {
        let url = resolve_artifact_url(&self.base_url, location).map_err(AgentError::Transport)?;
        debug!(%url, "fetching artifact");

        let mut request = self.client.get(url);
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::HttpStatus {
                status: status.as_u16(),
                summary: summarize_error_body(&body),
            });
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > self.max_artifact_bytes {
                return Err(AgentError::TooLarge {
                    limit: self.max_artifact_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value.get("detail").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                serde_json::Value::Array(items) => {
                    let messages: Vec<&str> = items
                        .iter()
                        .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                        .collect();
                    (!messages.is_empty()).then(|| messages.join("; "))
                }
                _ => None,
            })
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

const MAX_SUMMARY_CHARS: usize = 200;

/// Reduce an error body to one line fit for a notice.
pub(crate) fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let summary = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => extract_error_summary(&value)
            .filter(|summary| !summary.is_empty())
            .unwrap_or_else(|| value.to_string()),
        Err(_) => trimmed
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string(),
    };

    if summary.chars().count() > MAX_SUMMARY_CHARS {
        let truncated: String = summary.chars().take(MAX_SUMMARY_CHARS).collect();
        format!("{truncated}…")
    } else {
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::download::{
        download_artifact, DownloadDetails, DownloadError, DownloadRequest,
    };
    use crate::utils::test_utils::spawn_http_stub;
    use tempfile::TempDir;

    #[test]
    fn summarize_prefers_nested_error_message() {
        let raw = r#"{"error":{"message":"model   overloaded","type":"server_error"}}"#;
        assert_eq!(summarize_error_body(raw), "model overloaded");
    }

    #[test]
    fn summarize_reads_fastapi_detail() {
        assert_eq!(summarize_error_body(r#"{"detail":"Not Found"}"#), "Not Found");
        let raw = r#"{"detail":[{"loc":["body","query"],"msg":"field required"}]}"#;
        assert_eq!(summarize_error_body(raw), "field required");
    }

    #[test]
    fn summarize_falls_back_to_compact_json_and_first_line() {
        let raw = r#"{ "status": "failed" }"#;
        assert_eq!(summarize_error_body(raw), r#"{"status":"failed"}"#);
        assert_eq!(
            summarize_error_body("\n  Internal Server Error\n<trace>"),
            "Internal Server Error"
        );
        assert_eq!(summarize_error_body("   "), "<empty body>");
    }

    #[test]
    fn summarize_truncates_long_bodies() {
        let long = "x".repeat(500);
        let summary = summarize_error_body(&long);
        assert_eq!(summary.chars().count(), MAX_SUMMARY_CHARS + 1);
        assert!(summary.ends_with('…'));
    }

    #[tokio::test]
    async fn send_query_posts_json_and_parses_reply() {
        let stub = spawn_http_stub(
            "200 OK",
            r#"{"status":"success","message":"Hello","data":null}"#,
        )
        .await;
        let client = HttpAgentClient::new(&format!("{}/", stub.base_url), None);

        let response = client.send_query("Hi there").await.expect("reply");
        assert_eq!(response.message, "Hello");

        let request = stub.request().await;
        assert!(request.starts_with("POST /chat HTTP/1.1"));
        assert!(request
            .to_ascii_lowercase()
            .contains("content-type: application/json"));
        assert!(request.ends_with(r#"{"query":"Hi there"}"#));
    }

    #[tokio::test]
    async fn send_query_maps_non_success_status() {
        let stub = spawn_http_stub("500 Internal Server Error", r#"{"detail":"boom"}"#).await;
        let client = HttpAgentClient::new(&stub.base_url, None);

        let err = client.send_query("Hi").await.unwrap_err();
        assert_eq!(
            err,
            AgentError::HttpStatus {
                status: 500,
                summary: "boom".into()
            }
        );
    }

    #[tokio::test]
    async fn send_query_maps_unexpected_shape_to_parse_error() {
        let stub = spawn_http_stub("200 OK", r#"{"unexpected":true}"#).await;
        let client = HttpAgentClient::new(&stub.base_url, None);

        let err = client.send_query("Hi").await.unwrap_err();
        assert!(matches!(err, AgentError::Parse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn send_query_reports_connection_failure_as_transport() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let client = HttpAgentClient::new(&format!("http://{addr}"), None);
        let err = client.send_query("Hi").await.unwrap_err();
        assert!(matches!(err, AgentError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn fetch_artifact_resolves_relative_location() {
        let stub = spawn_http_stub("200 OK", "PK\u{3}\u{4}zipbytes").await;
        let client = HttpAgentClient::new(&stub.base_url, None);

        let bytes = client.fetch_artifact("/files/demo.zip").await.expect("bytes");
        assert_eq!(bytes, b"PK\x03\x04zipbytes");
        assert!(stub.request().await.starts_with("GET /files/demo.zip HTTP/1.1"));
    }

    #[tokio::test]
    async fn fetch_artifact_maps_missing_file() {
        let stub = spawn_http_stub("404 Not Found", "missing").await;
        let client = HttpAgentClient::new(&stub.base_url, None);

        let err = client
            .fetch_artifact(&format!("{}/gone.zip", stub.base_url))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AgentError::HttpStatus {
                status: 404,
                summary: "missing".into()
            }
        );
    }

    #[tokio::test]
    async fn fetch_artifact_enforces_size_cap() {
        let temp_dir = TempDir::new().expect("temp dir");
        let stub = spawn_http_stub("200 OK", &"z".repeat(64)).await;
        let client = HttpAgentClient::new(&stub.base_url, None).with_max_artifact_bytes(16);
        let request = DownloadRequest {
            details: DownloadDetails {
                project_name: "demo".into(),
                url: "/files/demo.zip".into(),
            },
            target_dir: temp_dir.path().to_path_buf(),
        };

        let err = download_artifact(&client, &request).await.unwrap_err();
        assert!(
            matches!(err, DownloadError::Fetch(AgentError::TooLarge { limit: 16 })),
            "got {err:?}"
        );
        assert!(!temp_dir.path().join("demo.zip").exists());
    }

    #[tokio::test]
    async fn fetch_artifact_times_out_when_agent_stalls() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(stream);
        });

        let client = HttpAgentClient::new(
            &format!("http://{addr}"),
            Some(Duration::from_millis(200)),
        );
        let err = tokio::time::timeout(Duration::from_secs(10), client.fetch_artifact("/x.zip"))
            .await
            .expect("request timeout should fire first")
            .unwrap_err();
        assert!(matches!(err, AgentError::Transport(_)), "got {err:?}");
    }
}
