//! Retrieval of the project archive produced by a completed agent action.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::api::AgentResponse;
use crate::core::agent_client::{AgentClient, AgentError};

const FALLBACK_PROJECT_NAME: &str = "project";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadDetails {
    pub project_name: String,
    pub url: String,
}

impl DownloadDetails {
    /// Details for the artifact a reply announces, if it announces one.
    pub fn from_response(response: &AgentResponse) -> Option<Self> {
        let data = response.data.as_ref()?;
        let url = data.artifact_url()?;
        Some(Self {
            project_name: data
                .project_name()
                .unwrap_or(FALLBACK_PROJECT_NAME)
                .to_string(),
            url: url.to_string(),
        })
    }

    /// `<project_name>.zip`, reduced to a single safe path component.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .project_name
            .trim()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();
        let stem = stem.trim_matches('.');
        if stem.is_empty() {
            format!("{FALLBACK_PROJECT_NAME}.zip")
        } else {
            format!("{stem}.zip")
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub details: DownloadDetails,
    pub target_dir: PathBuf,
}

#[derive(Debug)]
pub enum DownloadError {
    Fetch(AgentError),
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::Fetch(err) => write!(f, "{err}"),
            DownloadError::Write { path, source } => {
                write!(f, "could not write {}: {}", path.display(), source)
            }
        }
    }
}

impl StdError for DownloadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            DownloadError::Fetch(err) => Some(err),
            DownloadError::Write { source, .. } => Some(source),
        }
    }
}

pub async fn download_artifact(
    client: &dyn AgentClient,
    request: &DownloadRequest,
) -> Result<PathBuf, DownloadError> {
    let bytes = client
        .fetch_artifact(&request.details.url)
        .await
        .map_err(DownloadError::Fetch)?;
    let target = request.target_dir.join(request.details.file_name());
    save_artifact(&bytes, &target)?;
    info!(path = %target.display(), size = bytes.len(), "artifact saved");
    Ok(target)
}

/// Write the archive next to its final location and move it into place, so
/// an interrupted download never leaves a truncated zip behind.
pub fn save_artifact(bytes: &[u8], target: &Path) -> Result<(), DownloadError> {
    let write_err = |source: io::Error| DownloadError::Write {
        path: target.to_path_buf(),
        source,
    };

    let parent = target.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = parent {
        fs::create_dir_all(dir).map_err(write_err)?;
    }

    let mut temp_file = match parent {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new(),
    }
    .map_err(write_err)?;
    temp_file.write_all(bytes).map_err(write_err)?;
    temp_file.as_file_mut().sync_all().map_err(write_err)?;
    temp_file
        .persist(target)
        .map_err(|err| write_err(err.error))?;
    Ok(())
}
