//! Group aggregate
//!
//! A [`Group`] owns the members, the transaction log and the claims of one
//! risk pool. Mutations never modify a group in place: each one returns a
//! new snapshot with `version` incremented, leaving the original untouched.
//! A mutation that turns out to be a no-op (an ignored vote, a repeated
//! assessment) returns a clone with the same version, so [`GroupStore`]
//! knows there is nothing to commit.
//!
//! [`GroupStore`]: crate::store::GroupStore

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{
    Clock, ClaimId, Currency, GroupId, IdGenerator, MemberId, Money, TransactionId,
};
use domain_claims::{
    AiAssessment, Claim, ClaimStatus, QuorumRule, SoloClaimPolicy, VoteChoice, VoteOutcome,
    VoteRejection, VoteTally,
};

use crate::balance::{balance_after, find_member, member_display_name, pool_balance};
use crate::error::PoolError;
use crate::member::Member;
use crate::transaction::Transaction;

/// The next snapshot plus whatever the operation produced
pub type Mutation<T> = Result<(Group, T), PoolError>;

/// Outcome of a vote together with the claim as it stands afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteResult {
    pub outcome: VoteOutcome,
    pub claim: Claim,
}

/// Aggregate root of one risk pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    name: String,
    currency: Currency,
    solo_policy: SoloClaimPolicy,
    version: u64,
    members: Vec<Member>,
    transactions: Vec<Transaction>,
    /// Newest first
    claims: Vec<Claim>,
}

impl Group {
    pub fn new(id: GroupId, name: impl Into<String>, currency: Currency, members: Vec<Member>) -> Self {
        Self {
            id,
            name: name.into(),
            currency,
            solo_policy: SoloClaimPolicy::default(),
            version: 0,
            members,
            transactions: Vec::new(),
            claims: Vec::new(),
        }
    }

    pub fn with_solo_policy(mut self, policy: SoloClaimPolicy) -> Self {
        self.solo_policy = policy;
        self
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn solo_policy(&self) -> SoloClaimPolicy {
        self.solo_policy
    }

    /// Incremented by every committed mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn quorum_rule(&self) -> QuorumRule {
        QuorumRule::new(self.members.len()).with_solo_policy(self.solo_policy)
    }

    pub fn pool_balance(&self) -> Decimal {
        pool_balance(&self.transactions)
    }

    /// Pool balance in the group's currency
    pub fn balance(&self) -> Money {
        Money::new(self.pool_balance(), self.currency)
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        find_member(&self.members, id)
    }

    pub fn is_member(&self, id: MemberId) -> bool {
        self.member(id).is_some()
    }

    pub fn member_name(&self, id: MemberId) -> &str {
        member_display_name(&self.members, id)
    }

    pub fn claim(&self, id: ClaimId) -> Option<&Claim> {
        self.claims.iter().find(|c| c.id() == id)
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Claims still being processed, newest first
    pub fn pending_claims(&self) -> Vec<&Claim> {
        self.claims.iter().filter(|c| c.status().is_pending()).collect()
    }

    /// Decided claims, newest first
    pub fn historical_claims(&self) -> Vec<&Claim> {
        self.claims.iter().filter(|c| c.status().is_resolved()).collect()
    }

    pub fn claims_by(&self, member_id: MemberId) -> Vec<&Claim> {
        self.claims.iter().filter(|c| c.claimant_id() == member_id).collect()
    }

    /// Open claims the member may still vote on
    pub fn claims_awaiting_vote_from(&self, member_id: MemberId) -> Vec<&Claim> {
        if !self.is_member(member_id) {
            return Vec::new();
        }
        self.claims
            .iter()
            .filter(|c| c.can_vote(member_id).is_ok())
            .collect()
    }

    pub fn vote_tally(&self, claim_id: ClaimId) -> Option<VoteTally> {
        self.claim(claim_id).map(Claim::tally)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Files a claim in `PendingAi` at the front of the claims list
    pub fn file_claim(
        &self,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
        claimant_id: MemberId,
        description: &str,
        amount: Decimal,
    ) -> Mutation<Claim> {
        self.require_member(claimant_id)?;
        let claim = Claim::file(ClaimId::generate(ids), claimant_id, description, amount, clock.now())?;

        let mut next = self.successor();
        next.claims.insert(0, claim.clone());
        Ok((next, claim))
    }

    /// Stores the advisory outcome and opens the claim for voting
    ///
    /// Does nothing when the claim has already left `PendingAi`.
    pub fn record_assessment(&self, claim_id: ClaimId, assessment: Option<AiAssessment>) -> Mutation<Claim> {
        let index = self.claim_index(claim_id)?;
        if self.claims[index].status() != ClaimStatus::PendingAi {
            return Ok((self.clone(), self.claims[index].clone()));
        }

        let rule = self.quorum_rule();
        let mut next = self.successor();
        next.claims[index].record_assessment(assessment, &rule);
        let claim = next.claims[index].clone();
        Ok((next, claim))
    }

    /// Casts a vote; ineligible votes leave the group unchanged
    pub fn cast_vote(&self, claim_id: ClaimId, voter_id: MemberId, choice: VoteChoice) -> Mutation<VoteResult> {
        let index = self.claim_index(claim_id)?;
        let current = &self.claims[index];

        let rejection = if self.is_member(voter_id) {
            current.can_vote(voter_id).err()
        } else {
            Some(VoteRejection::NotAMember)
        };
        if let Some(rejection) = rejection {
            let result = VoteResult {
                outcome: VoteOutcome::Ignored(rejection),
                claim: current.clone(),
            };
            return Ok((self.clone(), result));
        }

        let rule = self.quorum_rule();
        let mut next = self.successor();
        let outcome = next.claims[index].cast_vote(voter_id, choice, &rule);
        let claim = next.claims[index].clone();
        Ok((next, VoteResult { outcome, claim }))
    }

    /// Appends a contribution from a member
    pub fn record_contribution(
        &self,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
        member_id: MemberId,
        amount: Decimal,
    ) -> Mutation<Transaction> {
        if amount <= Decimal::ZERO {
            return Err(PoolError::invalid_input(format!(
                "contribution must be positive, got {amount}"
            )));
        }
        self.require_member(member_id)?;

        let tx = Transaction::contribution(TransactionId::generate(ids), member_id, amount, clock.now());
        self.require_representable(&tx)?;
        let mut next = self.successor();
        next.transactions.push(tx.clone());
        Ok((next, tx))
    }

    /// Pays out an approved claim to its claimant
    pub fn settle_claim(&self, ids: &dyn IdGenerator, clock: &dyn Clock, claim_id: ClaimId) -> Mutation<Transaction> {
        let index = self.claim_index(claim_id)?;
        let claim = &self.claims[index];
        if claim.status() != ClaimStatus::Approved {
            return Err(PoolError::IllegalTransition(format!(
                "claim {} is {}, only approved claims can be settled",
                claim_id,
                claim.status()
            )));
        }

        let tx = Transaction::payout(TransactionId::generate(ids), claim.claimant_id(), claim.amount(), clock.now());
        self.require_representable(&tx)?;
        let mut next = self.successor();
        next.claims[index].mark_paid()?;
        next.transactions.push(tx.clone());
        Ok((next, tx))
    }

    fn successor(&self) -> Group {
        let mut next = self.clone();
        next.version += 1;
        next
    }

    fn require_member(&self, member_id: MemberId) -> Result<(), PoolError> {
        if self.is_member(member_id) {
            Ok(())
        } else {
            Err(PoolError::UnknownMember(member_id.to_string()))
        }
    }

    fn require_representable(&self, tx: &Transaction) -> Result<(), PoolError> {
        match balance_after(&self.transactions, tx) {
            Some(_) => Ok(()),
            None => Err(PoolError::invalid_input(format!(
                "{} of {} would overflow the pool balance",
                tx.kind, tx.amount
            ))),
        }
    }

    fn claim_index(&self, claim_id: ClaimId) -> Result<usize, PoolError> {
        self.claims
            .iter()
            .position(|c| c.id() == claim_id)
            .ok_or_else(|| PoolError::ClaimNotFound(claim_id.to_string()))
    }
}
