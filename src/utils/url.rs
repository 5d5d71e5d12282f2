//! URL utilities for building agent endpoints
//!
//! The base URL is user supplied, so it may or may not carry trailing
//! slashes. Everything that talks to the agent goes through these helpers so
//! endpoint paths never end up with doubled separators.

use reqwest::Url;

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use doki::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000///"), "http://localhost:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Construct a complete API endpoint URL from a base URL and endpoint path
///
/// # Examples
///
/// ```
/// use doki::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000", "chat"),
///     "http://localhost:8000/chat"
/// );
/// assert_eq!(
///     construct_api_url("http://localhost:8000/", "/chat"),
///     "http://localhost:8000/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Resolve an artifact location reported by the agent.
///
/// Absolute `http(s)` URLs are used as they are. Anything else is treated as
/// a path on the agent and joined onto the base URL.
pub fn resolve_artifact_url(base_url: &str, location: &str) -> Result<Url, String> {
    let location = location.trim();
    if let Ok(url) = Url::parse(location) {
        if matches!(url.scheme(), "http" | "https") {
            return Ok(url);
        }
    }

    let base = Url::parse(&format!("{}/", normalize_base_url(base_url)))
        .map_err(|e| format!("invalid base URL {base_url:?}: {e}"))?;
    base.join(location.trim_start_matches('/'))
        .map_err(|e| format!("invalid artifact location {location:?}: {e}"))
}

/// Check that a user-supplied base URL is usable before persisting it.
pub fn validate_base_url(base_url: &str) -> Result<String, String> {
    let normalized = normalize_base_url(base_url);
    let url = Url::parse(&normalized).map_err(|e| format!("{normalized:?} is not a URL: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(normalized),
        other => Err(format!("unsupported URL scheme {other:?} (expected http or https)")),
    }
}
