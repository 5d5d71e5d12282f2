//! Wire types for the agent's `/chat` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub query: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AgentResponse {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub data: Option<ActionData>,
}

/// Outcome of the agent's reasoning loop, attached to a reply when the agent
/// acted on the query.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ActionData {
    #[serde(default)]
    pub thought: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub action_args: Option<ActionArgs>,
    /// Location of the produced artifact. The agent reports `null` when the
    /// action produced nothing, and occasionally a non-string value.
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub response: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ActionArgs {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub package_manager: Option<String>,
}

impl ActionData {
    /// The artifact location, when the action completed with one.
    pub fn artifact_url(&self) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn project_name(&self) -> Option<&str> {
        self.action_args
            .as_ref()
            .and_then(|args| args.project_name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
