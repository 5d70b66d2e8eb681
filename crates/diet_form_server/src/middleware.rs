//! Logging and metrics around the submission client.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use diet_plan_client::{DietError, DietInput, DietPlan, DietPlanClient};
use tracing::debug;

/// Wraps a [`DietPlanClient`] and records timing and outcome of every
/// submission.
pub struct LoggingMiddleware<C: DietPlanClient + ?Sized> {
    inner: Arc<C>,
}

impl<C: DietPlanClient> LoggingMiddleware<C> {
    pub fn new(client: C) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }
}

impl<C: DietPlanClient + ?Sized> LoggingMiddleware<C> {
    pub fn from_arc(inner: Arc<C>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: DietPlanClient + ?Sized> DietPlanClient for LoggingMiddleware<C> {
    async fn submit_diet(&self, input: &DietInput) -> Result<DietPlan, DietError> {
        let start = Instant::now();
        debug!(goal = %input.goal, activity = %input.activity_level, "submitting to diet backend");

        let result = self.inner.submit_diet(input).await;

        let elapsed = start.elapsed();
        metrics::histogram!("diet_backend_request_seconds").record(elapsed.as_secs_f64());
        match &result {
            Ok(_) => debug!(?elapsed, "diet backend answered"),
            Err(e) => debug!(?elapsed, error = %e, "diet backend call failed"),
        }
        result
    }
}
