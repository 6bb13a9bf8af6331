//! Community votes on claims

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::MemberId;
use crate::error::ClaimError;

/// A member's choice on a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Approve,
    Deny,
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteChoice::Approve => write!(f, "approve"),
            VoteChoice::Deny => write!(f, "deny"),
        }
    }
}

impl FromStr for VoteChoice {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(VoteChoice::Approve),
            "deny" => Ok(VoteChoice::Deny),
            other => Err(ClaimError::invalid_input(format!("unknown vote choice '{other}'"))),
        }
    }
}

/// A single cast vote; immutable once recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub member_id: MemberId,
    pub choice: VoteChoice,
}

impl Vote {
    pub fn new(member_id: MemberId, choice: VoteChoice) -> Self {
        Self { member_id, choice }
    }
}

/// Running counts over a claim's votes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub approvals: usize,
    pub denials: usize,
}

impl VoteTally {
    pub fn of(votes: &[Vote]) -> Self {
        votes.iter().fold(Self::default(), |mut tally, vote| {
            match vote.choice {
                VoteChoice::Approve => tally.approvals += 1,
                VoteChoice::Deny => tally.denials += 1,
            }
            tally
        })
    }

    pub fn total(&self) -> usize {
        self.approvals + self.denials
    }
}
