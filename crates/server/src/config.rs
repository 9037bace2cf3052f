use std::env;

use coin_finder_core::models::settings::{
    DeploymentProfile, MagnitudeStyle, RefreshSettings, RetryPolicy,
};
use coin_finder_core::providers::coingecko::DEFAULT_BASE_URL;

/// Server configuration derived from `COIN_FINDER_*` environment variables.
///
/// `COIN_FINDER_PROFILE` (`standard` | `extended`) picks the preset; the
/// individual variables override single fields of it.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,

    // ── Upstream ───────────────────────────────────────────────────
    pub api_base_url: String,
    /// CoinGecko demo key. Empty ⇒ anonymous access.
    pub api_key: Option<String>,

    // ── Refresh cache ──────────────────────────────────────────────
    pub refresh: RefreshSettings,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "y" | "on"))
        .unwrap_or(default)
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let profile = env_opt("COIN_FINDER_PROFILE")
            .and_then(|s| s.parse::<DeploymentProfile>().ok())
            .unwrap_or(DeploymentProfile::Standard);
        let preset = RefreshSettings::for_profile(profile);

        let retry = RetryPolicy {
            max_attempts: env_parse("COIN_FINDER_RETRY_ATTEMPTS", preset.retry.max_attempts),
            base_delay_ms: env_parse("COIN_FINDER_RETRY_BASE_MS", preset.retry.base_delay_ms),
            max_delay_ms: env_parse("COIN_FINDER_RETRY_MAX_MS", preset.retry.max_delay_ms),
        };

        let magnitude_style = env_opt("COIN_FINDER_MAGNITUDE_STYLE")
            .and_then(|s| s.parse::<MagnitudeStyle>().ok())
            .unwrap_or(preset.magnitude_style);

        let refresh = RefreshSettings {
            target_count: env_parse("COIN_FINDER_TARGET_COUNT", preset.target_count),
            truncate: env_bool("COIN_FINDER_TRUNCATE", preset.truncate),
            per_page: env_parse("COIN_FINDER_PER_PAGE", preset.per_page),
            vs_currency: env_str("COIN_FINDER_VS_CURRENCY", &preset.vs_currency),
            max_pages: env_parse("COIN_FINDER_MAX_PAGES", preset.max_pages),
            deadline_secs: env_opt("COIN_FINDER_DEADLINE_SECS")
                .and_then(|s| s.parse().ok())
                .or(preset.deadline_secs),
            refresh_interval_secs: env_parse(
                "COIN_FINDER_REFRESH_INTERVAL_SECS",
                preset.refresh_interval_secs,
            ),
            retry,
            magnitude_style,
        };

        Self {
            bind: env_str("COIN_FINDER_BIND", "127.0.0.1"),
            port: env_parse("COIN_FINDER_PORT", 3000),
            api_base_url: env_str("COIN_FINDER_API_BASE_URL", DEFAULT_BASE_URL),
            api_key: env_opt("COIN_FINDER_API_KEY"),
            refresh,
        }
    }
}
