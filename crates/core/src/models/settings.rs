use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;

/// Default refresh period: every 30 minutes.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30 * 60;

/// Upstream page size requested per call.
pub const DEFAULT_PER_PAGE: u32 = 1000;

/// Named presets for how many coins a deployment collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentProfile {
    /// 600 coins, cut to exactly 600.
    Standard,
    /// At least 1000 coins, whole last page kept.
    Extended,
}

impl std::str::FromStr for DeploymentProfile {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(DeploymentProfile::Standard),
            "extended" => Ok(DeploymentProfile::Extended),
            other => Err(CoreError::InvalidSettings(format!(
                "unknown deployment profile '{other}' (expected 'standard' or 'extended')"
            ))),
        }
    }
}

/// How magnitudes of a billion and above are abbreviated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MagnitudeStyle {
    /// Billions are divided by 1e9 but still suffixed "M" (2.5e9 → "2.5M").
    #[default]
    Legacy,
    /// Billions get their own "B" suffix (2.5e9 → "2.5B").
    Billions,
}

impl std::str::FromStr for MagnitudeStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(MagnitudeStyle::Legacy),
            "billions" => Ok(MagnitudeStyle::Billions),
            other => Err(CoreError::InvalidSettings(format!(
                "unknown magnitude style '{other}' (expected 'legacy' or 'billions')"
            ))),
        }
    }
}

/// Retry-with-backoff policy applied to every page fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts per page, including the first one. Minimum 1.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each further attempt.
    pub base_delay_ms: u64,
    /// Upper bound for any single delay, `Retry-After` included.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 60_000,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    ///
    /// Exponential (`base * 2^(attempt-1)`) unless the upstream named a
    /// `Retry-After`; either way capped at `max_delay_ms`.
    pub fn delay_after(&self, attempt: u32, retry_after_secs: Option<u64>) -> Duration {
        let cap = Duration::from_millis(self.max_delay_ms);
        let delay = match retry_after_secs {
            Some(secs) => Duration::from_secs(secs),
            None => {
                let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
                Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
            }
        };
        delay.min(cap)
    }
}

/// Everything the refresh cache needs to know about one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshSettings {
    /// Minimum number of coins a refresh collects.
    pub target_count: usize,

    /// Cut the result to exactly `target_count` (otherwise the whole last
    /// page is kept).
    pub truncate: bool,

    /// Records requested per upstream page.
    pub per_page: u32,

    /// Quote currency (e.g., "usd").
    pub vs_currency: String,

    /// Hard bound on pages fetched per refresh.
    pub max_pages: u32,

    /// Optional wall-clock bound on one whole refresh.
    pub deadline_secs: Option<u64>,

    /// Period of the background refresh.
    pub refresh_interval_secs: u64,

    pub retry: RetryPolicy,

    pub magnitude_style: MagnitudeStyle,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self::for_profile(DeploymentProfile::Standard)
    }
}

impl RefreshSettings {
    /// Settings preset for a deployment profile.
    pub fn for_profile(profile: DeploymentProfile) -> Self {
        let (target_count, truncate) = match profile {
            DeploymentProfile::Standard => (600, true),
            DeploymentProfile::Extended => (1000, false),
        };
        Self {
            target_count,
            truncate,
            per_page: DEFAULT_PER_PAGE,
            vs_currency: "usd".to_string(),
            max_pages: 20,
            deadline_secs: None,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            retry: RetryPolicy::default(),
            magnitude_style: MagnitudeStyle::default(),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }

    /// Reject settings that would make a refresh impossible or unbounded.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.target_count == 0 {
            return Err(CoreError::InvalidSettings("target_count must be at least 1".into()));
        }
        if self.per_page == 0 {
            return Err(CoreError::InvalidSettings("per_page must be at least 1".into()));
        }
        if self.max_pages == 0 {
            return Err(CoreError::InvalidSettings("max_pages must be at least 1".into()));
        }
        let reachable = (self.per_page as usize).saturating_mul(self.max_pages as usize);
        if reachable < self.target_count {
            return Err(CoreError::InvalidSettings(format!(
                "per_page ({}) * max_pages ({}) cannot reach target_count ({})",
                self.per_page, self.max_pages, self.target_count
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(CoreError::InvalidSettings(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        if self.refresh_interval_secs == 0 {
            return Err(CoreError::InvalidSettings(
                "refresh_interval_secs must be greater than 0".into(),
            ));
        }
        if self.vs_currency.trim().is_empty() {
            return Err(CoreError::InvalidSettings("vs_currency must not be empty".into()));
        }
        Ok(())
    }
}
