//! Group DTOs

use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::{Currency, GroupId, Money};
use domain_claims::FundHealth;
use domain_pool::{FundHealthReport, Group, Member};

use super::claims::TransactionResponse;

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub amount: Decimal,
    pub currency: Currency,
    /// Formatted as members see it, e.g. "KES 2,500"
    pub display: String,
}

impl From<Money> for BalanceResponse {
    fn from(money: Money) -> Self {
        Self {
            amount: money.amount(),
            currency: money.currency(),
            display: money.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: GroupId,
    pub name: String,
    pub version: u64,
    pub balance: BalanceResponse,
    pub members: Vec<Member>,
    /// Newest first
    pub transactions: Vec<TransactionResponse>,
    pub pending_claims: usize,
    /// Last successful fund health prediction
    pub fund_health: FundHealth,
}

impl GroupResponse {
    pub fn new(group: &Group, fund_health: FundHealth) -> Self {
        Self {
            id: group.id(),
            name: group.name().to_string(),
            version: group.version(),
            balance: group.balance().into(),
            members: group.members().to_vec(),
            transactions: group
                .transactions()
                .iter()
                .rev()
                .map(|tx| TransactionResponse::new(tx.clone(), group))
                .collect(),
            pending_claims: group.pending_claims().len(),
            fund_health,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FundHealthResponse {
    pub health: FundHealth,
    pub last_known: Option<FundHealth>,
    pub notice: Option<String>,
}

impl From<FundHealthReport> for FundHealthResponse {
    fn from(report: FundHealthReport) -> Self {
        Self {
            health: report.health,
            last_known: report.last_known,
            notice: report.notice,
        }
    }
}
