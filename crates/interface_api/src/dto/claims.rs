//! Claims DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use core_kernel::{ClaimId, MemberId};
use domain_claims::{AiAssessment, Claim, ClaimStatus, Vote, VoteChoice, VoteOutcome, VoteTally};
use domain_pool::{Group, Transaction};

pub(crate) fn positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount > Decimal::ZERO {
        return Ok(());
    }
    let mut err = ValidationError::new("positive");
    err.message = Some("amount must be positive".into());
    Err(err)
}

#[derive(Debug, Deserialize, Validate)]
pub struct FileClaimRequest {
    pub member_id: MemberId,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub member_id: MemberId,
    pub choice: VoteChoice,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContributionRequest {
    pub member_id: MemberId,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
}

/// Filters for the claim listing
#[derive(Debug, Default, Deserialize)]
pub struct ClaimListQuery {
    pub status: Option<ClaimStatus>,
    pub member_id: Option<MemberId>,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub id: ClaimId,
    pub claimant_id: MemberId,
    pub claimant_name: String,
    pub description: String,
    pub amount: Decimal,
    pub status: ClaimStatus,
    pub filed_at: DateTime<Utc>,
    pub ai_assessment: Option<AiAssessment>,
    pub votes: Vec<Vote>,
    pub tally: VoteTally,
}

impl ClaimResponse {
    pub fn new(claim: &Claim, group: &Group) -> Self {
        Self {
            id: claim.id(),
            claimant_id: claim.claimant_id(),
            claimant_name: group.member_name(claim.claimant_id()).to_string(),
            description: claim.description().to_string(),
            amount: claim.amount(),
            status: claim.status(),
            filed_at: claim.filed_at(),
            ai_assessment: claim.ai_assessment().cloned(),
            votes: claim.votes().to_vec(),
            tally: claim.tally(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FiledClaimResponse {
    #[serde(flatten)]
    pub claim: ClaimResponse,
    /// Set when the claim went to community review without an assessment
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub recorded: bool,
    /// Why the vote was not counted
    pub rejection: Option<String>,
    pub claim: ClaimResponse,
}

impl VoteResponse {
    pub fn new(outcome: VoteOutcome, claim: ClaimResponse) -> Self {
        let rejection = match outcome {
            VoteOutcome::Recorded { .. } => None,
            VoteOutcome::Ignored(reason) => Some(reason.to_string()),
        };
        Self {
            recorded: rejection.is_none(),
            rejection,
            claim,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub member_name: String,
}

impl TransactionResponse {
    pub fn new(transaction: Transaction, group: &Group) -> Self {
        Self {
            member_name: group.member_name(transaction.member_id).to_string(),
            transaction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_positive_amount() {
        assert!(positive_amount(&dec!(0.01)).is_ok());
        assert!(positive_amount(&dec!(0)).is_err());
        assert!(positive_amount(&dec!(-10)).is_err());
    }

    #[test]
    fn test_blank_description_fails_validation() {
        let request: FileClaimRequest = serde_json::from_value(serde_json::json!({
            "member_id": "00000000-0000-0000-0000-000000000001",
            "description": "",
            "amount": "100"
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }
}
