//! Immutable description of one logical outbound GET.

use std::fmt;
use std::time::Duration;

/// Per-attempt timeout used when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Target URL, query parameters and per-attempt timeout for one call.
///
/// Built once with the consuming builder methods and then only borrowed by
/// the fetcher, so it stays the same across every retry attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    url: String,
    query: Vec<(String, String)>,
    timeout: Duration,
}

impl RequestDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Appends a query parameter. Numbers and strings are both accepted and
    /// sent as their display form.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn get_timeout(&self) -> Duration {
        self.timeout
    }
}

// Credentials travel as query parameters, so Debug only lists the keys.
impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.query.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("RequestDescriptor")
            .field("url", &self.url)
            .field("query_keys", &keys)
            .field("timeout", &self.timeout)
            .finish()
    }
}
