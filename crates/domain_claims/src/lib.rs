//! Claims Domain
//!
//! This crate implements the claim lifecycle of a community risk pool, from
//! filing through advisory assessment and community vote to settlement.
//!
//! # Claim Lifecycle
//!
//! ```text
//! PendingAi -> PendingVote -> Approved/Denied
//!                                 |
//!                              Approved -> Paid
//! ```
//!
//! A claim leaves `PendingAi` exactly once, whether or not the advisory
//! service answered. It leaves `PendingVote` only through [`QuorumRule`]
//! resolution after a vote is cast.

pub mod claim;
pub mod vote;
pub mod assessment;
pub mod quorum;
pub mod error;

pub use claim::{Claim, ClaimStatus, VoteOutcome, VoteRejection};
pub use vote::{Vote, VoteChoice, VoteTally};
pub use assessment::{AiAssessment, Recommendation, FundHealth, HealthStatus};
pub use quorum::{QuorumRule, Resolution, SoloClaimPolicy};
pub use error::ClaimError;
