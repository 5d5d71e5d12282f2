//! Shared constants used across the application

/// Agent address used when nothing else configures one. A build can bake in
/// its own default by setting `DOKI_API_URL` at compile time.
pub const FALLBACK_BASE_URL: &str = "http://localhost:8000";

pub const BUILD_BASE_URL: Option<&str> = option_env!("DOKI_API_URL");

/// Runtime override for the agent address.
pub const BASE_URL_ENV: &str = "DOKI_API_URL";

pub const CONFIG_DIR_ENV: &str = "DOKI_CONFIG_DIR";

/// `tracing` filter directives, e.g. `DOKI_LOG=doki=debug`.
pub const LOG_FILTER_ENV: &str = "DOKI_LOG";

pub const CHAT_ENDPOINT: &str = "chat";

/// Below this many terminal columns the sidebar collapses behind the
/// hamburger menu.
pub const NARROW_WIDTH_THRESHOLD: u16 = 80;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

pub const MAX_ARTIFACT_BYTES: usize = 256 * 1024 * 1024;

/// How many notices the status area keeps around.
pub const NOTICE_HISTORY: usize = 20;
