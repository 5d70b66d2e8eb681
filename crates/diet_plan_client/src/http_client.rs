//! HTTP client for the diet backend.
//!
//! This module provides a reqwest-based implementation of the [`DietPlanClient`](crate::DietPlanClient) trait.

use crate::config::Config;
use crate::retry::RetryPolicy;
use crate::{DietError, DietInput, DietPlan, DietPlanClient};
use async_trait::async_trait;
use std::time::Duration;

/// Path, relative to the base URL, that generates a plan.
pub const CREATE_DIET_PATH: &str = "/create";

/// Client for the diet backend using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestDietPlanClient {
    base_url: String,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl ReqwestDietPlanClient {
    /// Create a client with no request timeout and the default retry policy.
    ///
    /// # Arguments
    /// * `base_url` - The backend base URL (e.g., "http://localhost:3333")
    pub fn new(base_url: &str) -> Result<Self, DietError> {
        Self::with_options(base_url, None, RetryPolicy::default())
    }

    pub fn with_options(
        base_url: &str,
        timeout: Option<Duration>,
        retry: RetryPolicy,
    ) -> Result<Self, DietError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
            client: builder.build()?,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, DietError> {
        let retry = RetryPolicy {
            max_retries: cfg.max_retries,
            ..RetryPolicy::default()
        };
        Self::with_options(&cfg.api_base_url, Some(cfg.request_timeout), retry)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Handle a response, converting status codes to appropriate errors.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<DietPlan, DietError> {
        let status = resp.status();
        metrics::counter!("diet_plan_client_requests_total", "status" => status.as_u16().to_string())
            .increment(1);
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(resp.json::<DietPlan>().await?)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> DietError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();

        match status {
            400 | 422 => DietError::Rejected(body_snippet),
            _ => DietError::Api {
                status,
                body: body_snippet,
            },
        }
    }
}

/// Only failures where the request never reached the backend are safe to
/// repeat; plan generation is not idempotent.
fn is_connect_failure(e: &reqwest::Error) -> bool {
    e.is_connect()
}

#[async_trait]
impl DietPlanClient for ReqwestDietPlanClient {
    async fn submit_diet(&self, input: &DietInput) -> Result<DietPlan, DietError> {
        let url = format!("{}{}", self.base_url, CREATE_DIET_PATH);
        tracing::debug!(%url, "submitting diet form");
        let resp = self
            .retry
            .retry_async_if(is_connect_failure, || {
                self.client.post(&url).json(input).send()
            })
            .await?;
        self.handle_response(resp).await
    }
}
