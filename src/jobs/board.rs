use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;

use crate::config::{Settings, mask};
use crate::http::{RequestDescriptor, ResilientFetcher, Sleeper, TokioSleeper};

use super::query::SearchQuery;
use super::types::SearchResponse;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchJobs: Send + Sync {
    /// Searches listings. Transient upstream failures are retried; anything
    /// else comes back as an error whose cause downcasts to
    /// [`Failure`](crate::http::Failure).
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse>;
}

/// Client for an Adzuna-style job search endpoint.
pub struct JobBoard<S: Sleeper = TokioSleeper> {
    api_url: String,
    country: String,
    app_id: String,
    app_key: String,
    timeout: std::time::Duration,
    fetcher: ResilientFetcher<S>,
}

impl JobBoard<TokioSleeper> {
    /// Validates the settings and builds a board with a fresh HTTP client.
    #[tracing::instrument(skip(settings))]
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;

        let client = Client::builder()
            .user_agent("jobfetch-cli")
            .build()
            .context("Failed to build HTTP client")?;

        Self::with_fetcher(settings, ResilientFetcher::new(client, settings.retry))
    }
}

impl<S: Sleeper> JobBoard<S> {
    pub fn with_fetcher(settings: &Settings, fetcher: ResilientFetcher<S>) -> Result<Self> {
        let app_id = settings
            .app_id
            .clone()
            .context("ADZUNA_APP_ID is not set")?;
        let app_key = settings
            .app_key
            .clone()
            .context("ADZUNA_API_KEY is not set")?;

        debug!("Using app id {} for authentication", mask(&app_id));

        Ok(Self {
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            country: settings.country.clone(),
            app_id,
            app_key,
            timeout: settings.timeout,
            fetcher,
        })
    }

    /// Request for the first result page of `query`.
    pub fn descriptor(&self, query: &SearchQuery) -> RequestDescriptor {
        RequestDescriptor::new(format!("{}/{}/search/1", self.api_url, self.country))
            .param("app_id", &self.app_id)
            .param("app_key", &self.app_key)
            .param("results_per_page", query.num_results)
            .param("what", &query.role)
            .param("where", &query.location)
            .param("content-type", "application/json")
            .timeout(self.timeout)
    }
}

#[async_trait]
impl<S: Sleeper> SearchJobs for JobBoard<S> {
    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        query.validate().context("Invalid search parameters")?;

        info!(
            "Searching for {} '{}' jobs in {}...",
            query.num_results, query.role, query.location
        );

        let request = self.descriptor(query);
        let mut response: SearchResponse = self
            .fetcher
            .fetch(&request)
            .await
            .into_result()
            .context("Failed to fetch job listings")?;

        response.results.truncate(query.num_results as usize);
        info!("Found {} job listings", response.results.len());

        Ok(response)
    }
}
