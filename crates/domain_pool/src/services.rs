//! Pool application service
//!
//! [`PoolService`] is the single entry point used by both front-ends (the
//! HTTP API and the USSD menu). It commits every change through the
//! [`GroupStore`] and consults the advisory gateway where needed.
//!
//! Fund health is re-predicted in the background after every contribution;
//! [`PoolService::latest_health`] returns the last successful prediction.

use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use core_kernel::{
    ClaimId, Clock, HealthCheckResult, IdGenerator, MemberId, Money, RandomIdGenerator,
    SystemClock,
};
use domain_claims::{Claim, FundHealth, VoteChoice, VoteOutcome};

use crate::advisory::{AdvisoryGateway, Advised};
use crate::context::GroupContext;
use crate::error::PoolError;
use crate::group::{Group, VoteResult};
use crate::ports::ClaimSubmission;
use crate::store::GroupStore;
use crate::transaction::Transaction;

/// A newly filed claim after its assessment attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiledClaim {
    pub claim: Claim,
    /// Set when the assessment fell back to community review
    pub notice: Option<String>,
}

/// Result of a fund health refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundHealthReport {
    pub health: FundHealth,
    /// Most recent successful prediction, kept across failed refreshes
    pub last_known: Option<FundHealth>,
    pub notice: Option<String>,
}

/// Everything a fund health refresh needs, cheap to move into a task
#[derive(Debug, Clone)]
struct HealthMonitor {
    store: Arc<GroupStore>,
    gateway: Arc<AdvisoryGateway>,
    clock: Arc<dyn Clock>,
    last_health: Arc<RwLock<Option<FundHealth>>>,
}

impl HealthMonitor {
    async fn refresh(&self) -> FundHealthReport {
        let snapshot = self.store.snapshot().await;
        let context = GroupContext::from_group(&snapshot, self.clock.now());
        let advised = self.gateway.predict_health(&context).await;

        if advised.is_fallback() {
            return FundHealthReport {
                health: advised.value,
                last_known: self.last_health.read().await.clone(),
                notice: advised.notice,
            };
        }

        *self.last_health.write().await = Some(advised.value.clone());
        info!(status = %advised.value.status, "fund health updated");
        FundHealthReport {
            last_known: Some(advised.value.clone()),
            health: advised.value,
            notice: None,
        }
    }
}

#[derive(Debug)]
pub struct PoolService {
    store: Arc<GroupStore>,
    gateway: Arc<AdvisoryGateway>,
    ids: Arc<dyn IdGenerator>,
    health: HealthMonitor,
}

impl PoolService {
    pub fn new(store: GroupStore, gateway: AdvisoryGateway) -> Self {
        let store = Arc::new(store);
        let gateway = Arc::new(gateway);
        Self {
            health: HealthMonitor {
                store: Arc::clone(&store),
                gateway: Arc::clone(&gateway),
                clock: Arc::new(SystemClock),
                last_health: Arc::new(RwLock::new(None)),
            },
            store,
            gateway,
            ids: Arc::new(RandomIdGenerator),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.health.clock = clock;
        self
    }

    fn clock(&self) -> &dyn Clock {
        self.health.clock.as_ref()
    }

    /// Current group snapshot
    pub async fn group(&self) -> Arc<Group> {
        self.store.snapshot().await
    }

    pub async fn pool_balance(&self) -> Money {
        self.store.snapshot().await.balance()
    }

    /// Files a claim and runs its single assessment attempt
    ///
    /// The claim is committed in `PendingAi` before the advisory call, which
    /// sees the group as it was when the claim was filed. The gateway is
    /// time-bounded, so the claim always reaches `PendingVote` (or a solo
    /// resolution) before this returns.
    #[instrument(skip_all, fields(claimant = %claimant_id, amount = %amount))]
    pub async fn file_claim(
        &self,
        claimant_id: MemberId,
        description: &str,
        amount: Decimal,
    ) -> Result<FiledClaim, PoolError> {
        let mut context = None;
        let claim = self
            .store
            .update(|group| {
                context = Some(GroupContext::from_group(group, self.clock().now()));
                group.file_claim(self.ids.as_ref(), self.clock(), claimant_id, description, amount)
            })
            .await?;
        info!(claim_id = %claim.id(), "claim filed");

        let context = match context {
            Some(context) => context,
            None => GroupContext::from_group(&*self.store.snapshot().await, self.clock().now()),
        };
        let submission = ClaimSubmission::new(claim.description(), claim.amount());
        let Advised { value: assessment, notice } = self.gateway.assess(&submission, &context).await;

        let claim = self
            .store
            .update(|group| group.record_assessment(claim.id(), Some(assessment.clone())))
            .await?;
        info!(
            claim_id = %claim.id(),
            status = %claim.status(),
            recommendation = ?claim.ai_assessment().map(|a| a.recommendation),
            "claim assessed"
        );

        Ok(FiledClaim { claim, notice })
    }

    /// Casts a vote; ineligible votes are reported in the outcome, not as errors
    #[instrument(skip_all, fields(claim_id = %claim_id, voter = %voter_id))]
    pub async fn cast_vote(
        &self,
        claim_id: ClaimId,
        voter_id: MemberId,
        choice: VoteChoice,
    ) -> Result<VoteResult, PoolError> {
        let result = self
            .store
            .update(|group| group.cast_vote(claim_id, voter_id, choice))
            .await?;

        match result.outcome {
            VoteOutcome::Recorded { status } => info!(%choice, %status, "vote recorded"),
            VoteOutcome::Ignored(reason) => debug!(%reason, "vote ignored"),
        }
        Ok(result)
    }

    /// Records a contribution and starts a fund health refresh
    #[instrument(skip_all, fields(member = %member_id, amount = %amount))]
    pub async fn record_contribution(&self, member_id: MemberId, amount: Decimal) -> Result<Transaction, PoolError> {
        let tx = self
            .store
            .update(|group| group.record_contribution(self.ids.as_ref(), self.clock(), member_id, amount))
            .await?;
        info!(transaction_id = %tx.id, "contribution recorded");
        self.spawn_health_refresh();
        Ok(tx)
    }

    /// Disburses an approved claim from the pool
    #[instrument(skip_all, fields(claim_id = %claim_id))]
    pub async fn settle_claim(&self, claim_id: ClaimId) -> Result<Transaction, PoolError> {
        let tx = self
            .store
            .update(|group| group.settle_claim(self.ids.as_ref(), self.clock(), claim_id))
            .await?;
        info!(transaction_id = %tx.id, amount = %tx.amount, "claim settled");
        Ok(tx)
    }

    /// Refreshes the fund health prediction
    #[instrument(skip_all)]
    pub async fn fund_health(&self) -> FundHealthReport {
        self.health.refresh().await
    }

    /// Refreshes fund health on a background task
    ///
    /// Must be called from within a tokio runtime. Callers may drop the
    /// handle; the result lands in [`PoolService::latest_health`] either way.
    pub fn spawn_health_refresh(&self) -> JoinHandle<FundHealthReport> {
        let monitor = self.health.clone();
        tokio::spawn(async move { monitor.refresh().await })
    }

    /// Last successful prediction, or the placeholder shown before the first one
    pub async fn latest_health(&self) -> FundHealth {
        self.health
            .last_health
            .read()
            .await
            .clone()
            .unwrap_or_else(FundHealth::awaiting)
    }

    pub async fn advisory_health(&self) -> HealthCheckResult {
        self.gateway.health_check().await
    }
}
