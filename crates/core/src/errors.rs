use thiserror::Error;

/// Unified error type for the entire coin-finder-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Rate limited by {provider}")]
    RateLimited {
        provider: String,
        /// Seconds the upstream asked us to wait (`Retry-After`), if given.
        retry_after_secs: Option<u64>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Refresh ─────────────────────────────────────────────────────
    #[error("Upstream fetch failed ({provider}, page {page}, after {attempts} attempt(s)): {source}")]
    UpstreamFetch {
        provider: String,
        page: u32,
        attempts: u32,
        #[source]
        source: Box<CoreError>,
    },

    #[error("{provider} returned no market entries")]
    EmptyListing { provider: String },

    #[error("Refresh timed out after {0} seconds")]
    RefreshTimedOut(u64),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Unknown sort key: {0}")]
    InvalidSortKey(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

impl CoreError {
    /// Whether a failed page fetch is worth another attempt.
    ///
    /// Transport failures, rate limiting and server-side (5xx) API errors are
    /// transient; malformed payloads and client-side errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::Network(_) | CoreError::RateLimited { .. } => true,
            CoreError::Api { message, .. } => message.starts_with("HTTP 5"),
            _ => false,
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query parameters from URLs so API keys never reach the logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
