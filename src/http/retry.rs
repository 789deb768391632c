//! Retry policy and failure classification for outbound requests.

use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;

/// Default maximum number of attempts for one request.
pub const MAX_RETRIES: usize = 3;

/// Default pause before retrying a timeout, connection or server failure.
pub const RETRY_DELAY_MS: u64 = 2000;

/// Default pause before retrying after HTTP 429.
pub const RATE_LIMIT_DELAY_MS: u64 = 5000;

/// Upper bound for any single pause.
pub const MAX_DELAY_MS: u64 = 30_000;

/// Why an attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No response within the per-attempt timeout
    Timeout,
    /// Could not connect to the server
    Connection,
    /// HTTP 429
    RateLimited,
    /// HTTP 5xx
    ServerError,
    /// HTTP 401
    AuthenticationFailed,
    /// HTTP 403
    Forbidden,
    /// HTTP 404
    NotFound,
    /// Any other 4xx (or unexpected) status
    ClientError,
    /// 2xx status whose body does not parse into the expected structure
    MalformedResponse,
    /// The request could not be built or sent for a non-transient reason
    RequestFailed,
}

impl FailureKind {
    /// Whether another attempt with the identical request may succeed.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            FailureKind::Timeout
                | FailureKind::Connection
                | FailureKind::RateLimited
                | FailureKind::ServerError
        )
    }

    /// Short reason suitable for showing to an end user.
    pub fn reason(self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Connection => "connection failed",
            FailureKind::RateLimited => "rate limit exceeded",
            FailureKind::ServerError => "server error",
            FailureKind::AuthenticationFailed => "authentication failed",
            FailureKind::Forbidden => "access forbidden",
            FailureKind::NotFound => "not found",
            FailureKind::ClientError => "request rejected",
            FailureKind::MalformedResponse => "malformed response",
            FailureKind::RequestFailed => "request failed",
        }
    }
}

/// A classified failure, optionally carrying the HTTP status that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub status: Option<StatusCode>,
}

impl Failure {
    pub fn new(kind: FailureKind) -> Self {
        Self { kind, status: None }
    }

    pub fn with_status(kind: FailureKind, status: StatusCode) -> Self {
        Self {
            kind,
            status: Some(status),
        }
    }

    pub fn reason(&self) -> &'static str {
        self.kind.reason()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {})", self.reason(), status.as_u16()),
            None => write!(f, "{}", self.reason()),
        }
    }
}

impl std::error::Error for Failure {}

/// Result of a fetch: exactly one of three tags.
///
/// `RetryableFailure` describes a single attempt; the retry loop absorbs it,
/// so [`ResilientFetcher::fetch`](super::ResilientFetcher::fetch) only ever
/// hands back `Success` or `TerminalFailure`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Success(T),
    RetryableFailure(Failure),
    TerminalFailure(Failure),
}

impl<T> FetchOutcome<T> {
    /// Tags a failure according to its kind.
    pub fn failed(failure: Failure) -> Self {
        if failure.kind.is_retryable() {
            FetchOutcome::RetryableFailure(failure)
        } else {
            FetchOutcome::TerminalFailure(failure)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            FetchOutcome::Success(_) => None,
            FetchOutcome::RetryableFailure(f) | FetchOutcome::TerminalFailure(f) => Some(f),
        }
    }

    /// Converts to a `Result` whose error downcasts to [`Failure`].
    pub fn into_result(self) -> anyhow::Result<T> {
        match self {
            FetchOutcome::Success(value) => Ok(value),
            FetchOutcome::RetryableFailure(f) | FetchOutcome::TerminalFailure(f) => {
                Err(anyhow::Error::from(f))
            }
        }
    }
}

/// Classifies an HTTP status. Returns `None` for success statuses.
pub fn classify_status(status: StatusCode) -> Option<FailureKind> {
    if status.is_success() {
        return None;
    }

    let kind = match status {
        StatusCode::TOO_MANY_REQUESTS => FailureKind::RateLimited,
        StatusCode::UNAUTHORIZED => FailureKind::AuthenticationFailed,
        StatusCode::FORBIDDEN => FailureKind::Forbidden,
        StatusCode::NOT_FOUND => FailureKind::NotFound,
        s if s.is_server_error() => FailureKind::ServerError,
        // Other 4xx, and 1xx/3xx that reqwest did not resolve
        _ => FailureKind::ClientError,
    };
    Some(kind)
}

/// Classifies a transport error raised before a usable response arrived.
pub fn classify_transport_error(error: &reqwest::Error) -> FailureKind {
    if error.is_timeout() {
        FailureKind::Timeout
    } else if error.is_connect() {
        FailureKind::Connection
    } else if error.is_decode() {
        FailureKind::MalformedResponse
    } else {
        FailureKind::RequestFailed
    }
}

/// Bounded attempts and the pause taken between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub rate_limit_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            base_delay: Duration::from_millis(RETRY_DELAY_MS),
            rate_limit_delay: Duration::from_millis(RATE_LIMIT_DELAY_MS),
            max_delay: Duration::from_millis(MAX_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Pause before the attempt following `attempt` (1-based) which failed
    /// with `kind`.
    ///
    /// Rate limits wait at least `rate_limit_delay`, longer if the server
    /// sent `Retry-After`. Server errors back off exponentially. Timeouts
    /// and connection failures take the short base delay.
    pub fn delay_for(
        &self,
        kind: FailureKind,
        attempt: usize,
        retry_after: Option<Duration>,
    ) -> Duration {
        let delay = match kind {
            FailureKind::RateLimited => retry_after
                .map(|d| d.max(self.rate_limit_delay))
                .unwrap_or(self.rate_limit_delay),
            FailureKind::ServerError => {
                let exponent = attempt.saturating_sub(1).min(16) as u32;
                self.base_delay.saturating_mul(1u32 << exponent)
            }
            _ => self.base_delay,
        };
        delay.min(self.max_delay)
    }

    /// Whether another attempt is allowed after `attempt` (1-based) attempts.
    pub fn has_attempts_left(&self, attempt: usize) -> bool {
        attempt < self.max_attempts
    }
}
