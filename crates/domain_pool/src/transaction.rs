//! Pool transactions
//!
//! The transaction log is append-only. The pool balance is always derived
//! from it and never stored.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{MemberId, TransactionId};

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money paid into the pool by a member
    Contribution,
    /// Money paid out of the pool for a settled claim
    Payout,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Contribution => write!(f, "contribution"),
            TransactionKind::Payout => write!(f, "payout"),
        }
    }
}

/// A single entry in the pool's transaction log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub member_id: MemberId,
    /// Always positive; the kind decides the sign
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn contribution(id: TransactionId, member_id: MemberId, amount: Decimal, date: DateTime<Utc>) -> Self {
        Self {
            id,
            member_id,
            amount,
            date,
            kind: TransactionKind::Contribution,
        }
    }

    pub fn payout(id: TransactionId, member_id: MemberId, amount: Decimal, date: DateTime<Utc>) -> Self {
        Self {
            id,
            member_id,
            amount,
            date,
            kind: TransactionKind::Payout,
        }
    }

    /// Effect of this transaction on the pool balance
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Contribution => self.amount,
            TransactionKind::Payout => -self.amount,
        }
    }
}
