//! Demo group
//!
//! The Kamukunji Boda Boda Association: five riders, eight monthly
//! contributions, one settled claim and one claim still open for voting.
//! It is built by replaying ordinary group operations so every invariant
//! holds exactly as it would for live data.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{Currency, FixedClock, GroupId, IdGenerator, MemberId};
use domain_claims::{AiAssessment, Recommendation, VoteChoice};

use crate::error::PoolError;
use crate::group::Group;
use crate::member::Member;

pub const DEMO_GROUP_NAME: &str = "Kamukunji Boda Boda Association";

const MEMBER_NAMES: [&str; 5] = [
    "James Kariuki",
    "Asha Omar",
    "David Odhiambo",
    "Mary Wanjiru",
    "Peter Musyoka",
];

/// (member index, timestamp) of each 500 contribution
const CONTRIBUTIONS: [(usize, (u32, u32, u32, u32, u32)); 8] = [
    (0, (10, 1, 10, 0, 0)),
    (1, (10, 1, 10, 5, 0)),
    (2, (10, 1, 10, 10, 0)),
    (3, (10, 2, 11, 0, 0)),
    (4, (10, 2, 11, 5, 0)),
    (0, (11, 1, 9, 0, 0)),
    (1, (11, 1, 9, 5, 0)),
    (2, (11, 1, 9, 10, 0)),
];

fn at(month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, month, day, hour, minute, second)
        .single()
        .unwrap_or_default()
}

/// Builds the demo group, drawing ids from `ids`
pub fn demo_group(ids: &dyn IdGenerator, name: &str, currency: Currency) -> Result<Group, PoolError> {
    let members: Vec<Member> = MEMBER_NAMES.iter().map(|n| Member::enrol(ids, *n)).collect();
    let m: Vec<MemberId> = members.iter().map(|m| m.id).collect();
    let mut group = Group::new(GroupId::generate(ids), name, currency, members);
    let clock = FixedClock::new(at(10, 1, 10, 0, 0));

    for (member, (month, day, hour, minute, second)) in CONTRIBUTIONS {
        clock.set(at(month, day, hour, minute, second));
        group = group.record_contribution(ids, &clock, m[member], dec!(500))?.0;
    }

    clock.set(at(10, 15, 14, 0, 0));
    let (next, mirror) = group.file_claim(
        ids,
        &clock,
        m[2],
        "Minor accident, needed to replace a side mirror.",
        dec!(1500),
    )?;
    group = next
        .record_assessment(
            mirror.id(),
            Some(AiAssessment::new(
                Recommendation::Approve,
                "Low amount, common type of repair for this group. Seems legitimate.",
            )),
        )?
        .0;
    for voter in [m[0], m[1], m[3]] {
        group = group.cast_vote(mirror.id(), voter, VoteChoice::Approve)?.0;
    }
    clock.set(at(10, 16, 9, 0, 0));
    group = group.settle_claim(ids, &clock, mirror.id())?.0;

    clock.set(at(11, 5, 8, 30, 0));
    let (next, puncture) = group.file_claim(ids, &clock, m[4], "Puncture repair and new tube.", dec!(500))?;
    group = next
        .record_assessment(
            puncture.id(),
            Some(AiAssessment::new(
                Recommendation::Approve,
                "The claim amount is small and reasonable for the described issue. \
                 It aligns with typical minor operational costs for a boda boda.",
            )),
        )?
        .0;
    group = group.cast_vote(puncture.id(), m[1], VoteChoice::Approve)?.0;

    Ok(group)
}

/// The member a demo session acts as
pub fn demo_current_member(group: &Group) -> Option<MemberId> {
    group.members().first().map(|m| m.id)
}
