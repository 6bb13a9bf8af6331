//! Advisory gateway
//!
//! Wraps an [`AdvisoryPort`] with a timeout and the fallback policy. The
//! gateway never fails: a port error or timeout becomes a safe default plus
//! a notice that front-ends show to the member.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use core_kernel::{HealthCheckResult, PortError};
use domain_claims::{AiAssessment, FundHealth};

use crate::context::GroupContext;
use crate::ports::{AdvisoryPort, ClaimSubmission};

pub const DEFAULT_ADVISORY_TIMEOUT: Duration = Duration::from_secs(30);

/// Notice shown when a claim could not be assessed
pub const ASSESSMENT_FAILED_NOTICE: &str =
    "AI could not assess the claim. It will be moved to manual review.";

/// Notice shown when the fund health could not be predicted
pub const HEALTH_FAILED_NOTICE: &str =
    "Could not analyze fund health. Please check your connection or API key.";

/// A gateway answer and the notice to surface, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advised<T> {
    pub value: T,
    pub notice: Option<String>,
}

impl<T> Advised<T> {
    fn answered(value: T) -> Self {
        Self { value, notice: None }
    }

    fn fallback(value: T, notice: &str) -> Self {
        Self {
            value,
            notice: Some(notice.to_string()),
        }
    }

    /// True when the value is a fallback rather than a real answer
    pub fn is_fallback(&self) -> bool {
        self.notice.is_some()
    }
}

#[derive(Clone)]
pub struct AdvisoryGateway {
    port: Arc<dyn AdvisoryPort>,
    timeout: Duration,
}

impl std::fmt::Debug for AdvisoryGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryGateway")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AdvisoryGateway {
    pub fn new(port: Arc<dyn AdvisoryPort>, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Assesses a claim, substituting "Needs Review" on failure
    pub async fn assess(&self, submission: &ClaimSubmission, context: &GroupContext) -> Advised<AiAssessment> {
        let call = self.port.assess_claim(submission, context);
        match self.bounded("assess_claim", call).await {
            Ok(assessment) => Advised::answered(assessment),
            Err(error) => {
                tracing::warn!(%error, "claim assessment failed, falling back to community review");
                Advised::fallback(AiAssessment::needs_review_fallback(), ASSESSMENT_FAILED_NOTICE)
            }
        }
    }

    /// Predicts fund health, reporting `Unknown` on failure
    pub async fn predict_health(&self, context: &GroupContext) -> Advised<FundHealth> {
        match self.bounded("predict_health", self.port.predict_health(context)).await {
            Ok(health) => Advised::answered(health),
            Err(error) => {
                tracing::warn!(%error, "fund health prediction failed");
                Advised::fallback(FundHealth::unknown(), HEALTH_FAILED_NOTICE)
            }
        }
    }

    pub async fn health_check(&self) -> HealthCheckResult {
        self.port.health_check().await
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl std::future::Future<Output = Result<T, PortError>>,
    ) -> Result<T, PortError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| PortError::Timeout {
                operation: operation.to_string(),
                duration_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            })?
    }
}
