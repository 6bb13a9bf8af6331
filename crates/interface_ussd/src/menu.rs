//! Menu state machine
//!
//! [`MenuController`] turns one line of member input into a state change
//! and, where the pool has to be touched, a [`MenuCommand`] for the driver
//! to execute. It never awaits anything itself, so a slow or silent
//! advisory service cannot wedge the menu: claim filing parks the menu in
//! `Loading` until the driver reports back with the matching [`Ticket`].
//!
//! Two inputs are handled before the current screen sees them:
//!
//! - `00` returns to the main menu and discards every draft
//! - `0` (outside the main menu) goes back one screen, keeping drafts

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{ClaimId, MemberId, Money};
use domain_claims::VoteChoice;
use domain_pool::Group;

use crate::screens::{
    balance_message, claim_submitted_message, contribution_thanks, CLAIM_FAILED,
    CONTRIBUTION_CANCELLED, DESCRIPTION_TOO_SHORT, INVALID_CLAIM_AMOUNT,
    INVALID_CONTRIBUTION_AMOUNT, INVALID_OPTION, INVALID_SELECTION, INVALID_VOTE_OPTION,
    MY_CLAIMS_READ_ONLY, NO_CLAIMS_TO_VOTE, VOTE_THANKS,
};

/// Goes back one screen
pub const BACK: &str = "0";
/// Returns to the main menu
pub const MAIN_MENU: &str = "00";

/// Descriptions must be longer than this many characters
pub const MIN_DESCRIPTION_CHARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuState {
    Main,
    Loading,
    FileClaimAmount,
    FileClaimDesc,
    FileClaimConfirm,
    VoteList,
    VoteConfirm,
    ContributeAmount,
    ContributeConfirm,
    MyClaimsList,
}

/// The member driving a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    pub member_id: MemberId,
}

impl SessionContext {
    pub fn new(member_id: MemberId) -> Self {
        Self { member_id }
    }
}

/// A claim as listed on the vote screens, captured when the list opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSummary {
    pub id: ClaimId,
    pub claimant_name: String,
    pub amount: Decimal,
    pub description: String,
}

/// Values collected across screens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drafts {
    pub claim_amount: Option<Decimal>,
    pub claim_description: Option<String>,
    pub contribution_amount: Option<Decimal>,
    pub vote_list: Vec<ClaimSummary>,
    pub selected_claim: Option<ClaimSummary>,
}

impl Drafts {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Identifies one claim filing; completions carrying an older ticket are stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Work the driver performs against the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    FileClaim {
        ticket: Ticket,
        amount: Decimal,
        description: String,
    },
    Contribute {
        amount: Decimal,
    },
    Vote {
        claim_id: ClaimId,
        choice: VoteChoice,
    },
}

/// Result of handling one input
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    pub command: Option<MenuCommand>,
    /// The input was refused outright (menu busy)
    pub rejected: bool,
}

impl Transition {
    fn stay() -> Self {
        Self::default()
    }

    fn run(command: MenuCommand) -> Self {
        Self {
            command: Some(command),
            rejected: false,
        }
    }

    fn rejected() -> Self {
        Self {
            command: None,
            rejected: true,
        }
    }
}

/// How a claim filing ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilingOutcome {
    Submitted { notice: Option<String> },
    Failed,
}

#[derive(Debug, Clone)]
pub struct MenuController {
    context: SessionContext,
    state: MenuState,
    history: Vec<MenuState>,
    drafts: Drafts,
    message: Option<String>,
    loading: Option<Ticket>,
    next_ticket: u64,
}

impl MenuController {
    pub fn new(context: SessionContext) -> Self {
        Self {
            context,
            state: MenuState::Main,
            history: vec![MenuState::Main],
            drafts: Drafts::default(),
            message: None,
            loading: None,
            next_ticket: 1,
        }
    }

    pub fn context(&self) -> SessionContext {
        self.context
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn history(&self) -> &[MenuState] {
        &self.history
    }

    pub fn drafts(&self) -> &Drafts {
        &self.drafts
    }

    /// Inline message shown on the current screen
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn accepting_input(&self) -> bool {
        self.state != MenuState::Loading
    }

    /// Ticket of the filing the menu is waiting for
    pub fn pending_ticket(&self) -> Option<Ticket> {
        self.loading
    }

    /// Back to a fresh main menu; any filing in flight becomes stale
    pub fn reset(&mut self) {
        self.state = MenuState::Main;
        self.history = vec![MenuState::Main];
        self.drafts = Drafts::default();
        self.message = None;
        self.loading = None;
    }

    /// Replaces the inline message, e.g. after a failed command
    pub fn show_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Handles one line of input against the current group snapshot
    pub fn handle(&mut self, input: &str, group: &Group) -> Transition {
        if self.state == MenuState::Loading {
            debug!("input ignored while filing is in progress");
            return Transition::rejected();
        }

        let before = self.state;
        self.message = None;
        let input = input.trim();

        let transition = if input == MAIN_MENU {
            self.reset();
            Transition::stay()
        } else if input == BACK && self.state != MenuState::Main {
            self.back();
            Transition::stay()
        } else {
            self.dispatch(input, group)
        };

        debug!(from = ?before, to = ?self.state, depth = self.history.len(), "menu transition");
        transition
    }

    /// Applies the result of the filing identified by `ticket`
    ///
    /// Returns false, changing nothing, when the ticket is stale.
    pub fn complete_filing(&mut self, ticket: Ticket, outcome: FilingOutcome) -> bool {
        if self.loading != Some(ticket) {
            debug!(?ticket, "discarding stale filing result");
            return false;
        }

        let message = match outcome {
            FilingOutcome::Submitted { notice } => claim_submitted_message(notice.as_deref()),
            FilingOutcome::Failed => CLAIM_FAILED.to_string(),
        };
        self.reset_with(message);
        true
    }

    fn dispatch(&mut self, input: &str, group: &Group) -> Transition {
        match self.state {
            MenuState::Main => self.main_menu(input, group),
            MenuState::FileClaimAmount => {
                match parse_amount(input, group) {
                    Some(amount) => {
                        self.drafts.claim_amount = Some(amount);
                        self.navigate(MenuState::FileClaimDesc);
                    }
                    None => self.show_message(INVALID_CLAIM_AMOUNT),
                }
                Transition::stay()
            }
            MenuState::FileClaimDesc => {
                if input.chars().count() > MIN_DESCRIPTION_CHARS {
                    self.drafts.claim_description = Some(input.to_string());
                    self.navigate(MenuState::FileClaimConfirm);
                } else {
                    self.show_message(DESCRIPTION_TOO_SHORT);
                }
                Transition::stay()
            }
            MenuState::FileClaimConfirm => self.confirm_claim(input),
            MenuState::ContributeAmount => {
                match parse_amount(input, group) {
                    Some(amount) => {
                        self.drafts.contribution_amount = Some(amount);
                        self.navigate(MenuState::ContributeConfirm);
                    }
                    None => self.show_message(INVALID_CONTRIBUTION_AMOUNT),
                }
                Transition::stay()
            }
            MenuState::ContributeConfirm => self.confirm_contribution(input, group),
            MenuState::VoteList => {
                let selected = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| self.drafts.vote_list.get(i))
                    .cloned();
                match selected {
                    Some(claim) => {
                        self.drafts.selected_claim = Some(claim);
                        self.navigate(MenuState::VoteConfirm);
                    }
                    None => self.show_message(INVALID_SELECTION),
                }
                Transition::stay()
            }
            MenuState::VoteConfirm => self.confirm_vote(input),
            MenuState::MyClaimsList => {
                self.show_message(MY_CLAIMS_READ_ONLY);
                Transition::stay()
            }
            MenuState::Loading => Transition::rejected(),
        }
    }

    fn main_menu(&mut self, input: &str, group: &Group) -> Transition {
        match input {
            "1" => self.show_message(balance_message(group.balance())),
            "2" => self.navigate(MenuState::FileClaimAmount),
            "3" => {
                let claims: Vec<ClaimSummary> = group
                    .claims_awaiting_vote_from(self.context.member_id)
                    .into_iter()
                    .map(|c| ClaimSummary {
                        id: c.id(),
                        claimant_name: group.member_name(c.claimant_id()).to_string(),
                        amount: c.amount(),
                        description: c.description().to_string(),
                    })
                    .collect();
                if claims.is_empty() {
                    self.show_message(NO_CLAIMS_TO_VOTE);
                } else {
                    self.drafts.vote_list = claims;
                    self.navigate(MenuState::VoteList);
                }
            }
            "4" => self.navigate(MenuState::ContributeAmount),
            "5" => self.navigate(MenuState::MyClaimsList),
            _ => self.show_message(INVALID_OPTION),
        }
        Transition::stay()
    }

    fn confirm_claim(&mut self, input: &str) -> Transition {
        if input != "1" {
            self.reset();
            return Transition::stay();
        }

        let (Some(amount), Some(description)) =
            (self.drafts.claim_amount, self.drafts.claim_description.clone())
        else {
            self.reset_with(CLAIM_FAILED);
            return Transition::stay();
        };

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.loading = Some(ticket);
        // Not pushed: Loading is never a back target
        self.state = MenuState::Loading;

        Transition::run(MenuCommand::FileClaim {
            ticket,
            amount,
            description,
        })
    }

    fn confirm_contribution(&mut self, input: &str, group: &Group) -> Transition {
        match (input, self.drafts.contribution_amount) {
            ("1", Some(amount)) => {
                self.reset_with(contribution_thanks(Money::new(amount, group.currency())));
                Transition::run(MenuCommand::Contribute { amount })
            }
            _ => {
                self.reset_with(CONTRIBUTION_CANCELLED);
                Transition::stay()
            }
        }
    }

    fn confirm_vote(&mut self, input: &str) -> Transition {
        let choice = match input {
            "1" => VoteChoice::Approve,
            "2" => VoteChoice::Deny,
            _ => {
                self.show_message(INVALID_VOTE_OPTION);
                return Transition::stay();
            }
        };

        let Some(claim) = self.drafts.selected_claim.take() else {
            self.reset_with(INVALID_SELECTION);
            return Transition::stay();
        };
        self.reset_with(VOTE_THANKS);
        Transition::run(MenuCommand::Vote {
            claim_id: claim.id,
            choice,
        })
    }

    fn navigate(&mut self, to: MenuState) {
        self.history.push(to);
        self.state = to;
    }

    fn back(&mut self) {
        self.history.pop();
        match self.history.last() {
            Some(&previous) => self.state = previous,
            None => self.reset(),
        }
    }

    fn reset_with(&mut self, message: impl Into<String>) {
        self.reset();
        self.message = Some(message.into());
    }
}

fn parse_amount(input: &str, group: &Group) -> Option<Decimal> {
    Money::parse_positive(input, group.currency())
        .ok()
        .map(|m| m.amount())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use core_kernel::{Currency, SequentialIdGenerator};
    use domain_pool::seed::{demo_current_member, demo_group, DEMO_GROUP_NAME};
    use proptest::prelude::*;

    fn input() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("0".to_string()),
            Just("1".to_string()),
            Just("2".to_string()),
            Just("3".to_string()),
            Just("4".to_string()),
            Just("5".to_string()),
            Just("1500".to_string()),
            Just("Bent handlebar".to_string()),
            "[a-z ]{0,12}",
        ]
    }

    proptest! {
        #[test]
        fn main_menu_token_clears_everything(inputs in proptest::collection::vec(input(), 0..15)) {
            let ids = SequentialIdGenerator::new();
            let group = demo_group(&ids, DEMO_GROUP_NAME, Currency::KES).unwrap();
            let mut menu = MenuController::new(SessionContext::new(demo_current_member(&group).unwrap()));

            for input in &inputs {
                menu.handle(input, &group);
            }
            prop_assume!(menu.state() != MenuState::Loading);
            menu.handle(MAIN_MENU, &group);

            prop_assert_eq!(menu.state(), MenuState::Main);
            prop_assert_eq!(menu.history(), &[MenuState::Main][..]);
            prop_assert!(menu.drafts().is_empty());
        }

        #[test]
        fn history_top_is_current_state(inputs in proptest::collection::vec(input(), 0..20)) {
            let ids = SequentialIdGenerator::new();
            let group = demo_group(&ids, DEMO_GROUP_NAME, Currency::KES).unwrap();
            let mut menu = MenuController::new(SessionContext::new(demo_current_member(&group).unwrap()));

            for input in &inputs {
                menu.handle(input, &group);
                if menu.state() != MenuState::Loading {
                    prop_assert_eq!(menu.history().last().copied(), Some(menu.state()));
                }
            }
        }
    }
}
