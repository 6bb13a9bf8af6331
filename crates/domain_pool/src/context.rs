//! Figures sent to the advisory service

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Currency;

use crate::group::Group;
use crate::transaction::TransactionKind;

/// Days counted as "recent" activity
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Average claim assumed before any claim has been filed
pub const DEFAULT_AVERAGE_CLAIM: Decimal = dec!(500);

/// Summary of a group snapshot for advisory prompts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupContext {
    pub group_name: String,
    pub currency: Currency,
    pub total_pool: Decimal,
    pub member_count: usize,
    /// Number of contributions in the recent window
    pub recent_contributions: usize,
    /// Number of claims filed in the recent window
    pub recent_claims: usize,
    pub average_claim: Decimal,
}

impl GroupContext {
    pub fn from_group(group: &Group, now: DateTime<Utc>) -> Self {
        let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);

        let recent_contributions = group
            .transactions()
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Contribution && tx.date > cutoff)
            .count();
        let recent_claims = group.claims().iter().filter(|c| c.filed_at() > cutoff).count();

        let average_claim = if group.claims().is_empty() {
            DEFAULT_AVERAGE_CLAIM
        } else {
            // Summing shares keeps the total within range for any amounts
            let count = Decimal::from(group.claims().len());
            group
                .claims()
                .iter()
                .fold(Decimal::ZERO, |total, c| total.saturating_add(c.amount() / count))
                .round_dp(2)
        };

        Self {
            group_name: group.name().to_string(),
            currency: group.currency(),
            total_pool: group.pool_balance(),
            member_count: group.members().len(),
            recent_contributions,
            recent_claims,
            average_claim,
        }
    }
}
