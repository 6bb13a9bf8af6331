//! Advisory adapter for deployments without an API key

use async_trait::async_trait;

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_claims::{AiAssessment, FundHealth};

use crate::context::GroupContext;
use crate::ports::{AdvisoryPort, ClaimSubmission};

const SERVICE: &str = "advisory (offline)";

#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineAdvisory;

impl DomainPort for OfflineAdvisory {}

#[async_trait]
impl HealthCheckable for OfflineAdvisory {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::immediate(
            "offline-advisory",
            AdapterHealth::Unhealthy,
            Some("No advisory API key configured".to_string()),
        )
    }
}

#[async_trait]
impl AdvisoryPort for OfflineAdvisory {
    async fn assess_claim(&self, _: &ClaimSubmission, _: &GroupContext) -> Result<AiAssessment, PortError> {
        Err(PortError::unavailable(SERVICE))
    }

    async fn predict_health(&self, _: &GroupContext) -> Result<FundHealth, PortError> {
        Err(PortError::unavailable(SERVICE))
    }
}
