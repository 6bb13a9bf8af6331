//! Pool Domain Ports
//!
//! The advisory service is the only outbound dependency of the pool. It is
//! reached through [`AdvisoryPort`] so the generative API, the offline
//! stand-in and scripted test doubles are interchangeable.
//!
//! ```rust,ignore
//! let port: Arc<dyn AdvisoryPort> = match config.advisory_api_key {
//!     Some(key) => Arc::new(GeminiAdvisory::new(GeminiConfig::new(key))?),
//!     None => Arc::new(OfflineAdvisory),
//! };
//! let gateway = AdvisoryGateway::new(port, Duration::from_secs(30));
//! ```

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, HealthCheckable, PortError};
use domain_claims::{AiAssessment, FundHealth};

use crate::context::GroupContext;

/// The part of a new claim the advisory service gets to see
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    pub description: String,
    pub amount: Decimal,
}

impl ClaimSubmission {
    pub fn new(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            amount,
        }
    }
}

/// Advisory service operations
///
/// Answers are advisory only. Implementations must reject responses whose
/// recommendation or status is not one of the enumerated values with
/// `PortError::Transformation`.
#[async_trait]
pub trait AdvisoryPort: DomainPort + HealthCheckable {
    /// Recommends how the community should treat a new claim
    async fn assess_claim(
        &self,
        submission: &ClaimSubmission,
        context: &GroupContext,
    ) -> Result<AiAssessment, PortError>;

    /// Predicts the health of the pool
    async fn predict_health(&self, context: &GroupContext) -> Result<FundHealth, PortError>;
}

/// Scripted advisory port for testing
///
/// Replies are consumed in order; once a queue is empty the default reply
/// is used for every further call.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use core_kernel::{AdapterHealth, HealthCheckResult};
    use domain_claims::{HealthStatus, Recommendation};

    /// One scripted answer
    #[derive(Debug, Clone)]
    pub enum Reply<T> {
        Answer(T),
        /// Answer after a delay
        Delayed(Duration, T),
        /// Fail with `ServiceUnavailable`
        Unavailable,
        /// Fail with `Transformation`, as for a malformed response
        Malformed(String),
        /// Never answer
        Hang,
    }

    impl<T> Reply<T> {
        async fn play(self) -> Result<T, PortError> {
            match self {
                Reply::Answer(value) => Ok(value),
                Reply::Delayed(delay, value) => {
                    tokio::time::sleep(delay).await;
                    Ok(value)
                }
                Reply::Unavailable => Err(PortError::unavailable("scripted advisory")),
                Reply::Malformed(message) => Err(PortError::transformation(message)),
                Reply::Hang => std::future::pending().await,
            }
        }
    }

    #[derive(Debug)]
    pub struct ScriptedAdvisory {
        assessments: Mutex<VecDeque<Reply<AiAssessment>>>,
        health: Mutex<VecDeque<Reply<FundHealth>>>,
        default_assessment: Reply<AiAssessment>,
        default_health: Reply<FundHealth>,
        assess_calls: AtomicUsize,
        health_calls: AtomicUsize,
        last_context: Mutex<Option<GroupContext>>,
    }

    impl ScriptedAdvisory {
        pub fn new(default_assessment: Reply<AiAssessment>, default_health: Reply<FundHealth>) -> Self {
            Self {
                assessments: Mutex::new(VecDeque::new()),
                health: Mutex::new(VecDeque::new()),
                default_assessment,
                default_health,
                assess_calls: AtomicUsize::new(0),
                health_calls: AtomicUsize::new(0),
                last_context: Mutex::new(None),
            }
        }

        /// Recommends approval and reports a healthy fund
        pub fn approving() -> Self {
            Self::new(
                Reply::Answer(AiAssessment::new(Recommendation::Approve, "Amount is typical for this repair.")),
                Reply::Answer(FundHealth::new(HealthStatus::Healthy, "Contributions comfortably cover claims.")),
            )
        }

        /// Every call fails
        pub fn failing() -> Self {
            Self::new(Reply::Unavailable, Reply::Unavailable)
        }

        /// No call ever answers
        pub fn hanging() -> Self {
            Self::new(Reply::Hang, Reply::Hang)
        }

        pub fn then_assess(self, reply: Reply<AiAssessment>) -> Self {
            lock(&self.assessments).push_back(reply);
            self
        }

        pub fn then_health(self, reply: Reply<FundHealth>) -> Self {
            lock(&self.health).push_back(reply);
            self
        }

        pub fn assess_calls(&self) -> usize {
            self.assess_calls.load(Ordering::SeqCst)
        }

        pub fn health_calls(&self) -> usize {
            self.health_calls.load(Ordering::SeqCst)
        }

        /// Context passed to the most recent call
        pub fn last_context(&self) -> Option<GroupContext> {
            lock(&self.last_context).clone()
        }

        fn remember(&self, context: &GroupContext) {
            *lock(&self.last_context) = Some(context.clone());
        }
    }

    fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(|e| e.into_inner())
    }

    impl DomainPort for ScriptedAdvisory {}

    #[async_trait]
    impl HealthCheckable for ScriptedAdvisory {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::immediate(
                "scripted-advisory",
                AdapterHealth::Healthy,
                Some("Scripted adapter always healthy".to_string()),
            )
        }
    }

    #[async_trait]
    impl AdvisoryPort for ScriptedAdvisory {
        async fn assess_claim(
            &self,
            _submission: &ClaimSubmission,
            context: &GroupContext,
        ) -> Result<AiAssessment, PortError> {
            self.assess_calls.fetch_add(1, Ordering::SeqCst);
            self.remember(context);
            let reply = lock(&self.assessments)
                .pop_front()
                .unwrap_or_else(|| self.default_assessment.clone());
            reply.play().await
        }

        async fn predict_health(&self, context: &GroupContext) -> Result<FundHealth, PortError> {
            self.health_calls.fetch_add(1, Ordering::SeqCst);
            self.remember(context);
            let reply = lock(&self.health)
                .pop_front()
                .unwrap_or_else(|| self.default_health.clone());
            reply.play().await
        }
    }
}
