//! Resilient HTTP fetching: one GET, classified outcome, bounded retries.

mod client;
mod request;
mod retry;
mod sleep;

pub use client::ResilientFetcher;
pub use request::{DEFAULT_TIMEOUT, RequestDescriptor};
pub use retry::{
    Failure, FailureKind, FetchOutcome, MAX_DELAY_MS, MAX_RETRIES, RATE_LIMIT_DELAY_MS,
    RETRY_DELAY_MS, RetryPolicy, classify_status, classify_transport_error,
};
#[cfg(test)]
pub use sleep::MockSleeper;
pub use sleep::{Sleeper, TokioSleeper};
