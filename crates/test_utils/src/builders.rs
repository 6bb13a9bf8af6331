//! Test Data Builders
//!
//! Builder patterns for groups and fully wired pool services. Tests name
//! only what matters to them and take defaults for everything else.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as Days, Utc};
use core_kernel::{Currency, FixedClock, GroupId, IdGenerator, MemberId, SequentialIdGenerator};
use domain_claims::SoloClaimPolicy;
use domain_pool::{AdvisoryGateway, Group, GroupStore, Member, PoolService, ScriptedAdvisory};
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;

use crate::fixtures::TemporalFixtures;

/// Builder for constructing test groups
pub struct TestGroupBuilder {
    name: String,
    currency: Currency,
    member_names: Vec<String>,
    contributions: Vec<(usize, Decimal)>,
    solo_policy: SoloClaimPolicy,
    start: DateTime<Utc>,
}

impl Default for TestGroupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestGroupBuilder {
    /// Creates a builder for an empty KES group
    pub fn new() -> Self {
        Self {
            name: "Test Riders Group".to_string(),
            currency: Currency::KES,
            member_names: Vec::new(),
            contributions: Vec::new(),
            solo_policy: SoloClaimPolicy::default(),
            start: TemporalFixtures::demo_today() - Days::days(90),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Adds `count` members with generated names
    pub fn with_members(mut self, count: usize) -> Self {
        self.member_names.extend((0..count).map(|_| Name().fake::<String>()));
        self
    }

    pub fn with_member(mut self, name: impl Into<String>) -> Self {
        self.member_names.push(name.into());
        self
    }

    /// Records a contribution from the member at `index`, one day apart
    pub fn with_contribution(mut self, index: usize, amount: Decimal) -> Self {
        self.contributions.push((index, amount));
        self
    }

    /// Every member contributes `amount` once
    pub fn with_contribution_from_each(mut self, amount: Decimal) -> Self {
        let count = self.member_names.len();
        self.contributions.extend((0..count).map(|i| (i, amount)));
        self
    }

    pub fn with_solo_policy(mut self, policy: SoloClaimPolicy) -> Self {
        self.solo_policy = policy;
        self
    }

    /// Builds the group with ids from a fresh sequential generator
    pub fn build(self) -> Group {
        self.build_with(&SequentialIdGenerator::new())
    }

    /// Builds the group, drawing ids from `ids`
    pub fn build_with(self, ids: &dyn IdGenerator) -> Group {
        let members: Vec<Member> = self
            .member_names
            .iter()
            .map(|name| Member::enrol(ids, name.clone()))
            .collect();
        let member_ids: Vec<MemberId> = members.iter().map(|m| m.id).collect();
        let mut group = Group::new(GroupId::generate(ids), self.name, self.currency, members)
            .with_solo_policy(self.solo_policy);

        let clock = FixedClock::new(self.start);
        for (index, amount) in self.contributions {
            let member = member_ids[index % member_ids.len()];
            group = group.record_contribution(ids, &clock, member, amount).unwrap().0;
            clock.advance(Days::days(1));
        }
        group
    }
}

/// A pool service wired to a scripted advisory
pub struct TestPool {
    pub service: Arc<PoolService>,
    pub advisory: Arc<ScriptedAdvisory>,
    pub members: Vec<MemberId>,
}

/// Builder for a [`TestPool`]
pub struct TestPoolBuilder {
    group: Option<Group>,
    advisory: Option<ScriptedAdvisory>,
    timeout: Duration,
    now: DateTime<Utc>,
}

impl Default for TestPoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPoolBuilder {
    pub fn new() -> Self {
        Self {
            group: None,
            advisory: None,
            timeout: Duration::from_secs(30),
            now: TemporalFixtures::demo_today(),
        }
    }

    /// Serves `group`; defaults to the demo group
    pub fn with_group(mut self, group: Group) -> Self {
        self.group = Some(group);
        self
    }

    /// Defaults to [`ScriptedAdvisory::approving`]
    pub fn with_advisory(mut self, advisory: ScriptedAdvisory) -> Self {
        self.advisory = Some(advisory);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn build(self) -> TestPool {
        // Past anything the group builders hand out
        let ids = Arc::new(SequentialIdGenerator::starting_at(1_000_000));
        let group = self.group.unwrap_or_else(crate::fixtures::DemoFixtures::group);
        let members = group.members().iter().map(|m| m.id).collect();
        let advisory = Arc::new(self.advisory.unwrap_or_else(ScriptedAdvisory::approving));

        let service = PoolService::new(
            GroupStore::new(group),
            AdvisoryGateway::new(advisory.clone(), self.timeout),
        )
        .with_id_generator(ids)
        .with_clock(Arc::new(FixedClock::new(self.now)));

        TestPool {
            service: Arc::new(service),
            advisory,
            members,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_group_builder() {
        let group = TestGroupBuilder::new()
            .with_member("Asha Omar")
            .with_members(3)
            .with_contribution_from_each(dec!(200))
            .with_contribution(0, dec!(50))
            .build();

        assert_eq!(group.members().len(), 4);
        assert_eq!(group.members()[0].name, "Asha Omar");
        assert!(group.members().iter().all(|m| !m.name.is_empty()));
        assert_eq!(group.transactions().len(), 5);
        assert_eq!(group.pool_balance(), dec!(850));
    }

    #[tokio::test]
    async fn test_pool_builder_defaults_to_demo() {
        let pool = TestPoolBuilder::new().build();
        assert_eq!(pool.members.len(), 5);
        assert_eq!(pool.service.pool_balance().await.to_string(), "KES 2,500");
    }
}
