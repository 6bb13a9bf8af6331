//! Pre-built Test Fixtures
//!
//! Ready-to-use test data. Everything here is deterministic: ids come from
//! sequential generators and clocks are fixed.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{Currency, FixedClock, MemberId, Money, SequentialIdGenerator};
use domain_claims::{AiAssessment, FundHealth, HealthStatus, Recommendation};
use domain_pool::seed::{demo_current_member, demo_group, DEMO_GROUP_NAME};
use domain_pool::Group;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// The standard monthly contribution
    pub fn kes_500() -> Money {
        Money::new(dec!(500), Currency::KES)
    }

    /// A typical repair claim
    pub fn kes_1500() -> Money {
        Money::new(dec!(1500), Currency::KES)
    }

    pub fn kes_zero() -> Money {
        Money::zero(Currency::KES)
    }
}

/// Fixture for dates and clocks
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// "Today" for demo-group scenarios, after all seeded activity
    pub fn demo_today() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 11, 20, 9, 0, 0).unwrap()
    }

    pub fn demo_clock() -> FixedClock {
        FixedClock::new(Self::demo_today())
    }
}

/// Fixture for free-text inputs
pub struct StringFixtures;

impl StringFixtures {
    pub fn claim_description() -> &'static str {
        "Cracked headlamp after hitting a pothole"
    }

    /// Too short for the menu's description prompt
    pub fn short_description() -> &'static str {
        "tyre"
    }
}

/// Fixture for advisory answers
pub struct AdvisoryFixtures;

impl AdvisoryFixtures {
    pub fn approve() -> AiAssessment {
        AiAssessment::new(Recommendation::Approve, "Amount is typical for this repair.")
    }

    pub fn deny() -> AiAssessment {
        AiAssessment::new(Recommendation::Deny, "Amount is far above typical repairs.")
    }

    pub fn at_risk() -> FundHealth {
        FundHealth::new(HealthStatus::AtRisk, "Claims are outpacing contributions.")
    }
}

/// The seeded demo group
pub struct DemoFixtures;

impl DemoFixtures {
    /// Demo group built from a fresh sequential id generator
    pub fn group() -> Group {
        Self::group_with(&SequentialIdGenerator::new())
    }

    pub fn group_with(ids: &SequentialIdGenerator) -> Group {
        demo_group(ids, DEMO_GROUP_NAME, Currency::KES).unwrap()
    }

    /// The member demo sessions act as (James Kariuki)
    pub fn current_member(group: &Group) -> MemberId {
        demo_current_member(group).unwrap()
    }

    /// Member id by seeded name
    pub fn member_named(group: &Group, name: &str) -> MemberId {
        group
            .members()
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.id)
            .unwrap_or_else(|| panic!("no demo member named {name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_fixtures() {
        let group = DemoFixtures::group();
        assert_eq!(DemoFixtures::current_member(&group), DemoFixtures::member_named(&group, "James Kariuki"));
        assert_eq!(group.balance().to_string(), "KES 2,500");
        assert!(TemporalFixtures::demo_today() > group.transactions().last().unwrap().date);
    }
}
