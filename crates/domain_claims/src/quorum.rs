//! Quorum resolution
//!
//! Turns the votes accumulated on a claim into a final decision. The rule is
//! evaluated after every single vote so that a clear majority resolves the
//! claim without waiting for the remaining members.
//!
//! With `n` members:
//!
//! ```text
//! required approvals = ceil(n / 2)
//! eligible voters    = n - 1            (the claimant never votes)
//!
//! approvals >= required                      -> Approved
//! denials   >  eligible - required           -> Denied  (approval now unreachable)
//! votes     >= eligible                      -> Denied  (everyone voted, no majority)
//! otherwise                                  -> still pending
//! ```
//!
//! Ties deny once every eligible voter has voted, because approvals never
//! reach the ceiling majority.

use serde::{Deserialize, Serialize};

use crate::vote::VoteTally;

/// Final outcome of a community vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Approved,
    Denied,
}

/// What to do with a claim filed in a group where nobody else can vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoloClaimPolicy {
    /// Deny as soon as the claim opens for voting
    #[default]
    AutoDeny,
    /// Approve as soon as the claim opens for voting
    AutoApprove,
    /// Leave the claim open until more members join
    RemainPending,
}

/// Quorum parameters for one group size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuorumRule {
    member_count: usize,
    solo_policy: SoloClaimPolicy,
}

impl QuorumRule {
    pub fn new(member_count: usize) -> Self {
        Self {
            member_count,
            solo_policy: SoloClaimPolicy::default(),
        }
    }

    pub fn with_solo_policy(mut self, policy: SoloClaimPolicy) -> Self {
        self.solo_policy = policy;
        self
    }

    pub fn member_count(&self) -> usize {
        self.member_count
    }

    pub fn solo_policy(&self) -> SoloClaimPolicy {
        self.solo_policy
    }

    /// Approvals needed to carry a claim: `ceil(members / 2)`
    pub fn required_approvals(&self) -> usize {
        self.member_count.div_ceil(2)
    }

    /// Members other than the claimant
    pub fn eligible_voters(&self) -> usize {
        self.member_count.saturating_sub(1)
    }

    /// Resolution once a claim opens for voting, before any vote is cast
    ///
    /// Only a group without eligible voters resolves here, according to the
    /// solo claim policy.
    pub fn resolve_on_open(&self) -> Option<Resolution> {
        if self.eligible_voters() > 0 {
            return None;
        }
        match self.solo_policy {
            SoloClaimPolicy::AutoDeny => Some(Resolution::Denied),
            SoloClaimPolicy::AutoApprove => Some(Resolution::Approved),
            SoloClaimPolicy::RemainPending => None,
        }
    }

    /// Resolution after a vote has been recorded
    pub fn resolve(&self, tally: &VoteTally) -> Option<Resolution> {
        let required = self.required_approvals();
        let eligible = self.eligible_voters();

        if tally.approvals >= required {
            return Some(Resolution::Approved);
        }
        // Signed so that groups where required exceeds eligible compare correctly
        let deny_margin = eligible as i64 - required as i64;
        if tally.denials as i64 > deny_margin {
            return Some(Resolution::Denied);
        }
        if tally.total() >= eligible {
            return Some(Resolution::Denied);
        }
        None
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn adding_approvals_never_leaves_approved(
            members in 2usize..40,
            approvals in 0usize..40,
            extra in 1usize..10
        ) {
            let rule = QuorumRule::new(members);
            let approvals = approvals.min(rule.eligible_voters());
            let before = rule.resolve(&tally(approvals, 0));
            let after = rule.resolve(&tally(approvals + extra, 0));

            if before == Some(Resolution::Approved) {
                prop_assert_eq!(after, Some(Resolution::Approved));
            }
        }

        #[test]
        fn full_turnout_always_resolves(members in 2usize..40, approvals in 0usize..40) {
            let rule = QuorumRule::new(members);
            let approvals = approvals.min(rule.eligible_voters());
            let denials = rule.eligible_voters() - approvals;

            prop_assert!(rule.resolve(&tally(approvals, denials)).is_some());
        }

        #[test]
        fn approval_requires_strict_ceiling_majority(members in 2usize..40, approvals in 0usize..40) {
            let rule = QuorumRule::new(members);
            let approvals = approvals.min(rule.eligible_voters());
            let denials = rule.eligible_voters() - approvals;
            let outcome = rule.resolve(&tally(approvals, denials));

            prop_assert_eq!(
                outcome == Some(Resolution::Approved),
                approvals >= rule.required_approvals()
            );
        }
    }

    fn tally(approvals: usize, denials: usize) -> VoteTally {
        VoteTally { approvals, denials }
    }
}
