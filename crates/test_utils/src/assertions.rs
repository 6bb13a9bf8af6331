//! Custom Test Assertions
//!
//! Assertion helpers for domain types that give more meaningful failure
//! messages than plain `assert_eq!`.

use core_kernel::{ClaimId, Money};
use domain_claims::{Claim, ClaimStatus, QuorumRule, Resolution};
use domain_pool::{Group, TransactionKind};
use rust_decimal::Decimal;

/// Asserts that a Money value renders as `expected` (e.g. "KES 2,500")
pub fn assert_money_display(actual: &Money, expected: &str) {
    assert_eq!(
        actual.to_string(),
        expected,
        "Money mismatch: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts the status of a claim in `group`
///
/// # Panics
///
/// Panics if the claim is missing or has a different status
pub fn assert_claim_status(group: &Group, claim_id: ClaimId, expected: ClaimStatus) {
    let claim = group
        .claim(claim_id)
        .unwrap_or_else(|| panic!("Claim {claim_id} not found in group {}", group.name()));
    assert_eq!(
        claim.status(),
        expected,
        "Claim {} has status {}, expected {}",
        claim_id,
        claim.status(),
        expected
    );
}

/// Asserts that no member voted twice and the claimant did not vote
pub fn assert_votes_well_formed(claim: &Claim) {
    let voters: Vec<_> = claim.votes().iter().map(|v| v.member_id).collect();
    assert!(
        !voters.contains(&claim.claimant_id()),
        "Claimant {} voted on their own claim {}",
        claim.claimant_id(),
        claim.id()
    );
    for (i, voter) in voters.iter().enumerate() {
        assert!(
            !voters[i + 1..].contains(voter),
            "Member {} voted more than once on claim {}",
            voter,
            claim.id()
        );
    }
}

/// Asserts that a resolved claim's status agrees with its tally
pub fn assert_resolution_matches_tally(claim: &Claim, rule: &QuorumRule) {
    let expected = match claim.status() {
        ClaimStatus::Approved | ClaimStatus::Paid => Some(Resolution::Approved),
        ClaimStatus::Denied => Some(Resolution::Denied),
        ClaimStatus::PendingAi | ClaimStatus::PendingVote => return,
    };
    let from_tally = if rule.eligible_voters() == 0 {
        rule.resolve_on_open()
    } else {
        rule.resolve(&claim.tally())
    };
    assert_eq!(
        from_tally,
        expected,
        "Claim {} is {} but its tally {:?} resolves to {:?}",
        claim.id(),
        claim.status(),
        claim.tally(),
        from_tally
    );
}

/// Asserts that the pool balance equals contributions minus payouts
pub fn assert_balance_matches_log(group: &Group) {
    let (contributions, payouts) = group.transactions().iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(c, p), tx| match tx.kind {
            TransactionKind::Contribution => (c + tx.amount, p),
            TransactionKind::Payout => (c, p + tx.amount),
        },
    );
    assert_eq!(
        group.pool_balance(),
        contributions - payouts,
        "Balance {} does not match log: contributions={}, payouts={}",
        group.pool_balance(),
        contributions,
        payouts
    );
}
