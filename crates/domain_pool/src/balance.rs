//! Derived pool figures and member lookup

use rust_decimal::Decimal;

use core_kernel::MemberId;

use crate::member::Member;
use crate::transaction::Transaction;

/// Name shown when a member id cannot be resolved
pub const UNKNOWN_MEMBER: &str = "Unknown Member";

/// Sum of contributions minus sum of payouts
///
/// Saturates at the bounds of `Decimal`. Logs built through [`Group`]
/// never get there, since it refuses any transaction that would overflow.
///
/// [`Group`]: crate::group::Group
pub fn pool_balance(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .fold(Decimal::ZERO, |balance, tx| balance.saturating_add(tx.signed_amount()))
}

/// The balance once `next` is appended, or `None` if it overflows
pub fn balance_after(transactions: &[Transaction], next: &Transaction) -> Option<Decimal> {
    transactions
        .iter()
        .chain(std::iter::once(next))
        .try_fold(Decimal::ZERO, |balance, tx| balance.checked_add(tx.signed_amount()))
}

pub fn find_member(members: &[Member], id: MemberId) -> Option<&Member> {
    members.iter().find(|m| m.id == id)
}

/// The member's name, or "Unknown Member"
pub fn member_display_name(members: &[Member], id: MemberId) -> &str {
    find_member(members, id).map_or(UNKNOWN_MEMBER, |m| m.name.as_str())
}
