//! Pool Domain
//!
//! This crate owns the aggregate root of a community risk pool, the
//! [`Group`], together with everything that changes it:
//!
//! - **Members and transactions**: the member list and the append-only
//!   contribution/payout log the pool balance is derived from
//! - **Group operations**: copy-on-write mutations (file a claim, record an
//!   assessment, vote, contribute, settle) returning new snapshots
//! - **GroupStore**: the single authoritative snapshot, updated with
//!   optimistic compare-and-swap so concurrent sessions never lose writes
//! - **Advisory gateway**: the [`AdvisoryPort`] seam with its adapters, and
//!   the timeout and fallback policy around it
//! - **PoolService**: the operations both front-ends call
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_pool::{AdvisoryGateway, GroupStore, OfflineAdvisory, PoolService};
//!
//! let store = GroupStore::new(seed::demo_group(&ids, seed::DEMO_GROUP_NAME, Currency::KES)?);
//! let gateway = AdvisoryGateway::new(Arc::new(OfflineAdvisory), DEFAULT_ADVISORY_TIMEOUT);
//! let service = PoolService::new(store, gateway);
//!
//! let filed = service.file_claim(member, "Puncture repair", dec!(500)).await?;
//! assert_eq!(filed.claim.status(), ClaimStatus::PendingVote);
//! ```

pub mod member;
pub mod transaction;
pub mod balance;
pub mod group;
pub mod store;
pub mod context;
pub mod ports;
pub mod advisory;
pub mod adapters;
pub mod services;
pub mod seed;
pub mod error;

pub use member::Member;
pub use transaction::{Transaction, TransactionKind};
pub use balance::{pool_balance, balance_after, find_member, member_display_name, UNKNOWN_MEMBER};
pub use group::{Group, Mutation, VoteResult};
pub use store::GroupStore;
pub use context::GroupContext;
pub use ports::{AdvisoryPort, ClaimSubmission};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{Reply, ScriptedAdvisory};
pub use advisory::{
    Advised, AdvisoryGateway, ASSESSMENT_FAILED_NOTICE, DEFAULT_ADVISORY_TIMEOUT,
    HEALTH_FAILED_NOTICE,
};
pub use adapters::{GeminiAdvisory, GeminiConfig, OfflineAdvisory};
pub use services::{FiledClaim, FundHealthReport, PoolService};
pub use error::PoolError;
