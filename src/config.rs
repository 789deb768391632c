//! Settings for talking to the job search endpoint.

use anyhow::{Result, bail};
use std::time::Duration;

use crate::http::{DEFAULT_TIMEOUT, RetryPolicy};

pub const DEFAULT_API_URL: &str = "https://api.adzuna.com/v1/api/jobs";
pub const DEFAULT_COUNTRY: &str = "us";

/// Endpoint, credentials and retry settings supplied by the application.
#[derive(Clone)]
pub struct Settings {
    pub api_url: String,
    pub country: String,
    pub app_id: Option<String>,
    pub app_key: Option<String>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            app_id: None,
            app_key: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_url", &self.api_url)
            .field("country", &self.country)
            .field("app_id", &self.app_id.as_deref().map(mask))
            .field("app_key", &self.app_key.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Settings {
    /// Reports every problem at once rather than stopping at the first.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.app_id.as_deref().is_none_or(|v| v.trim().is_empty()) {
            errors.push("ADZUNA_APP_ID is not set");
        }
        if self.app_key.as_deref().is_none_or(|v| v.trim().is_empty()) {
            errors.push("ADZUNA_API_KEY is not set");
        }
        if self.api_url.trim().is_empty() {
            errors.push("API URL cannot be empty");
        }
        if self.country.trim().is_empty() {
            errors.push("country cannot be empty");
        }
        if self.retry.max_attempts == 0 {
            errors.push("max retries must be at least 1");
        }
        if self.timeout.is_zero() {
            errors.push("timeout must be greater than zero");
        }

        if !errors.is_empty() {
            bail!("Invalid configuration:\n  - {}", errors.join("\n  - "));
        }
        Ok(())
    }
}

/// Keeps the first and last two characters of a credential for logs.
pub fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 6 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}*********{}", head, tail)
}
