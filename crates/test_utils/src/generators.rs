//! Property-Based Test Generators
//!
//! Proptest strategies for amounts, vote sequences and menu input.

use core_kernel::Currency;
use domain_claims::VoteChoice;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating supported currencies
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::KES),
        Just(Currency::UGX),
        Just(Currency::TZS),
        Just(Currency::RWF),
        Just(Currency::USD),
    ]
}

/// Strategy for positive amounts with up to two decimal places
pub fn positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for zero and negative amounts
pub fn non_positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..=0i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for text a member might type at an amount prompt, valid or not
pub fn amount_input_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..100_000u32).prop_map(|n| n.to_string()),
        Just("0".to_string()),
        Just("-250".to_string()),
        Just("1,500".to_string()),
        Just("abc".to_string()),
        Just(String::new()),
        "[0-9a-z .,-]{0,8}",
    ]
}

pub fn vote_choice_strategy() -> impl Strategy<Value = VoteChoice> {
    prop_oneof![Just(VoteChoice::Approve), Just(VoteChoice::Deny)]
}

/// Strategy for group sizes that have at least one eligible voter
pub fn group_size_strategy() -> impl Strategy<Value = usize> {
    2usize..12
}

/// Strategy for a group size plus vote attempts by member index
///
/// Indices cover the whole group, claimant (index 0) and repeat voters
/// included, so ineligible votes are exercised too.
pub fn vote_sequence_strategy() -> impl Strategy<Value = (usize, Vec<(usize, VoteChoice)>)> {
    group_size_strategy().prop_flat_map(|size| {
        (
            Just(size),
            prop::collection::vec((0..size, vote_choice_strategy()), 0..(size * 2)),
        )
    })
}

/// Strategy for one line of menu input
pub fn menu_input_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (0u8..6).prop_map(|n| n.to_string()),
        1 => Just("00".to_string()),
        1 => (1u32..5_000u32).prop_map(|n| n.to_string()),
        1 => Just("Broken rear light and indicator".to_string()),
        1 => "[a-z ]{0,10}",
    ]
}
