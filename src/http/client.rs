//! HTTP client with built-in retry logic and failure classification.

use log::{debug, warn};
use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::request::RequestDescriptor;
use super::retry::{
    Failure, FailureKind, FetchOutcome, RetryPolicy, classify_status, classify_transport_error,
};
use super::sleep::{Sleeper, TokioSleeper};

/// Issues one GET per attempt and retries transient failures.
///
/// Holds no per-call state, so one fetcher can serve any number of
/// independent calls.
#[derive(Clone)]
pub struct ResilientFetcher<S: Sleeper = TokioSleeper> {
    client: Client,
    policy: RetryPolicy,
    sleeper: S,
}

impl ResilientFetcher<TokioSleeper> {
    /// Creates a fetcher wrapping the given reqwest Client.
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self::with_sleeper(client, policy, TokioSleeper)
    }
}

impl<S: Sleeper> ResilientFetcher<S> {
    pub fn with_sleeper(client: Client, policy: RetryPolicy, sleeper: S) -> Self {
        Self {
            client,
            policy,
            sleeper,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs the request described by `request`, retrying transient
    /// failures, and deserializes the JSON body.
    ///
    /// Returns `Success` or `TerminalFailure`. Retryable failures of the last
    /// allowed attempt are reported as terminal.
    #[tracing::instrument(skip(self))]
    pub async fn fetch<T: DeserializeOwned>(&self, request: &RequestDescriptor) -> FetchOutcome<T> {
        debug!("GET JSON from {}...", request.url());

        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let (outcome, retry_after) = self.fetch_once::<T>(request).await;

            let failure = match outcome {
                FetchOutcome::RetryableFailure(failure) => failure,
                terminal_or_success => {
                    if let Some(f) = terminal_or_success.failure() {
                        debug!("{}: non-retryable failure: {}", request.url(), f);
                    }
                    return terminal_or_success;
                }
            };

            if !self.policy.has_attempts_left(attempt) {
                warn!(
                    "{}: giving up after {} attempts ({})",
                    request.url(),
                    attempt,
                    failure
                );
                return FetchOutcome::TerminalFailure(failure);
            }

            let delay = self.policy.delay_for(failure.kind, attempt, retry_after);
            warn!(
                "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                request.url(),
                attempt,
                max_attempts,
                failure,
                delay.as_millis()
            );
            self.sleeper.sleep(delay).await;
        }
    }

    /// Single attempt without retry. Also returns the server's `Retry-After`
    /// hint, if any.
    async fn fetch_once<T: DeserializeOwned>(
        &self,
        request: &RequestDescriptor,
    ) -> (FetchOutcome<T>, Option<Duration>) {
        let response = match self
            .client
            .get(request.url())
            .query(request.query())
            .timeout(request.get_timeout())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("request to {} failed: {}", request.url(), e);
                return (
                    FetchOutcome::failed(Failure::new(classify_transport_error(&e))),
                    None,
                );
            }
        };

        let status = response.status();
        if let Some(kind) = classify_status(status) {
            let retry_after = parse_retry_after(&response);
            return (
                FetchOutcome::failed(Failure::with_status(kind, status)),
                retry_after,
            );
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                debug!("reading body from {} failed: {}", request.url(), e);
                return (
                    FetchOutcome::failed(Failure::with_status(classify_transport_error(&e), status)),
                    None,
                );
            }
        };

        match serde_json::from_slice::<T>(&body) {
            Ok(value) => (FetchOutcome::Success(value), None),
            Err(e) => {
                debug!("failed to parse JSON response from {}: {}", request.url(), e);
                (
                    FetchOutcome::TerminalFailure(Failure::with_status(
                        FailureKind::MalformedResponse,
                        status,
                    )),
                    None,
                )
            }
        }
    }
}

/// Reads a `Retry-After` header given in seconds. HTTP-date values are
/// ignored and fall back to the policy delay.
fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
