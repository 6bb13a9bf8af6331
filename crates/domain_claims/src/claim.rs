//! Claim aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{ClaimId, MemberId};
use crate::assessment::AiAssessment;
use crate::error::ClaimError;
use crate::quorum::{QuorumRule, Resolution};
use crate::vote::{Vote, VoteChoice, VoteTally};

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    /// Filed, waiting for the advisory assessment
    PendingAi,
    /// Open for community vote
    PendingVote,
    /// Carried by the community
    Approved,
    /// Rejected by the community
    Denied,
    /// Disbursed from the pool
    Paid,
}

impl ClaimStatus {
    /// Returns true once the community has decided
    pub fn is_resolved(&self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Denied | ClaimStatus::Paid)
    }

    /// Returns true while the claim is still being processed
    pub fn is_pending(&self) -> bool {
        matches!(self, ClaimStatus::PendingAi | ClaimStatus::PendingVote)
    }

    /// Short label for menus and lists ("PENDING VOTE")
    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::PendingAi => "PENDING AI",
            ClaimStatus::PendingVote => "PENDING VOTE",
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::Denied => "DENIED",
            ClaimStatus::Paid => "PAID",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Resolution> for ClaimStatus {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Approved => ClaimStatus::Approved,
            Resolution::Denied => ClaimStatus::Denied,
        }
    }
}

/// Why a vote was not recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteRejection {
    /// The claim is not open for voting
    NotOpen(ClaimStatus),
    /// The member has already voted on this claim
    AlreadyVoted,
    /// Claimants cannot vote on their own claim
    OwnClaim,
    /// The voter does not belong to the group
    NotAMember,
}

impl fmt::Display for VoteRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteRejection::NotOpen(status) => write!(f, "claim is {status}, not open for voting"),
            VoteRejection::AlreadyVoted => write!(f, "member has already voted"),
            VoteRejection::OwnClaim => write!(f, "claimants cannot vote on their own claim"),
            VoteRejection::NotAMember => write!(f, "voter is not a member of the group"),
        }
    }
}

/// Result of casting a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The vote was appended; `status` is the claim status afterwards
    Recorded { status: ClaimStatus },
    /// Nothing changed
    Ignored(VoteRejection),
}

impl VoteOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, VoteOutcome::Recorded { .. })
    }
}

/// A member's request to draw from the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    id: ClaimId,
    claimant_id: MemberId,
    description: String,
    amount: Decimal,
    filed_at: DateTime<Utc>,
    status: ClaimStatus,
    ai_assessment: Option<AiAssessment>,
    votes: Vec<Vote>,
}

impl Claim {
    /// Files a new claim awaiting assessment
    ///
    /// The description is trimmed; it must not be empty and the amount must
    /// be positive.
    pub fn file(
        id: ClaimId,
        claimant_id: MemberId,
        description: &str,
        amount: Decimal,
        filed_at: DateTime<Utc>,
    ) -> Result<Self, ClaimError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ClaimError::invalid_input("description must not be empty"));
        }
        if amount <= Decimal::ZERO {
            return Err(ClaimError::invalid_input(format!("amount must be positive, got {amount}")));
        }

        Ok(Self {
            id,
            claimant_id,
            description: description.to_string(),
            amount,
            filed_at,
            status: ClaimStatus::PendingAi,
            ai_assessment: None,
            votes: Vec::new(),
        })
    }

    pub fn id(&self) -> ClaimId {
        self.id
    }

    pub fn claimant_id(&self) -> MemberId {
        self.claimant_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn filed_at(&self) -> DateTime<Utc> {
        self.filed_at
    }

    pub fn status(&self) -> ClaimStatus {
        self.status
    }

    pub fn ai_assessment(&self) -> Option<&AiAssessment> {
        self.ai_assessment.as_ref()
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn tally(&self) -> VoteTally {
        VoteTally::of(&self.votes)
    }

    pub fn has_voted(&self, member_id: MemberId) -> bool {
        self.votes.iter().any(|v| v.member_id == member_id)
    }

    /// Records the advisory outcome and opens the claim for voting
    ///
    /// `None` means the assessment attempt failed; a "Needs Review"
    /// placeholder is stored instead. The transition always happens for a
    /// claim in `PendingAi`; on any other claim this does nothing, so the
    /// assessment is set at most once.
    pub fn record_assessment(&mut self, assessment: Option<AiAssessment>, rule: &QuorumRule) {
        if self.status != ClaimStatus::PendingAi {
            tracing::debug!(claim_id = %self.id, status = %self.status, "assessment ignored");
            return;
        }

        self.ai_assessment = Some(assessment.unwrap_or_else(AiAssessment::needs_review_fallback));
        self.status = ClaimStatus::PendingVote;

        if let Some(resolution) = rule.resolve_on_open() {
            self.status = resolution.into();
        }
    }

    /// Checks whether `member_id` may vote on this claim right now
    pub fn can_vote(&self, member_id: MemberId) -> Result<(), VoteRejection> {
        if self.status != ClaimStatus::PendingVote {
            return Err(VoteRejection::NotOpen(self.status));
        }
        if member_id == self.claimant_id {
            return Err(VoteRejection::OwnClaim);
        }
        if self.has_voted(member_id) {
            return Err(VoteRejection::AlreadyVoted);
        }
        Ok(())
    }

    /// Casts a vote and re-evaluates the quorum
    ///
    /// Ineligible votes leave the claim untouched and report why.
    pub fn cast_vote(&mut self, member_id: MemberId, choice: VoteChoice, rule: &QuorumRule) -> VoteOutcome {
        if let Err(rejection) = self.can_vote(member_id) {
            return VoteOutcome::Ignored(rejection);
        }

        self.votes.push(Vote::new(member_id, choice));
        if let Some(resolution) = rule.resolve(&self.tally()) {
            self.status = resolution.into();
        }

        VoteOutcome::Recorded { status: self.status }
    }

    /// Marks an approved claim as disbursed
    pub fn mark_paid(&mut self) -> Result<(), ClaimError> {
        if self.status != ClaimStatus::Approved {
            return Err(ClaimError::InvalidStatusTransition {
                from: format!("{:?}", self.status),
                to: format!("{:?}", ClaimStatus::Paid),
            });
        }
        self.status = ClaimStatus::Paid;
        Ok(())
    }
}
