//! Screen texts
//!
//! Every screen other than the main menu ends with the navigation footer.
//! An inline message, when set, is shown above the screen body.

use serde::Serialize;

use core_kernel::Money;
use domain_pool::Group;

use crate::menu::{MenuController, MenuState};

pub const INVALID_OPTION: &str = "Invalid option. Please try again.";
pub const INVALID_CLAIM_AMOUNT: &str = "Invalid amount. Please enter a number.";
pub const INVALID_CONTRIBUTION_AMOUNT: &str = "Invalid amount. Please enter a positive number.";
pub const DESCRIPTION_TOO_SHORT: &str = "Description is too short. Please provide more detail.";
pub const INVALID_SELECTION: &str = "Invalid selection. Please try again.";
pub const INVALID_VOTE_OPTION: &str = "Invalid option. Please enter 1 or 2.";
pub const MY_CLAIMS_READ_ONLY: &str = "Invalid input. Enter 00 for Main Menu.";
pub const NO_CLAIMS_TO_VOTE: &str = "There are no pending claims for you to vote on.";
pub const CONTRIBUTION_CANCELLED: &str = "Contribution cancelled.";
pub const VOTE_THANKS: &str = "Thank you for your vote.";
pub const CLAIM_SUBMITTED: &str = "Claim submitted successfully. It will be reviewed.";
pub const CLAIM_FAILED: &str = "Error submitting claim. Please try again later.";
pub const CONTRIBUTION_FAILED: &str = "Error recording contribution. Please try again later.";
pub const VOTE_FAILED: &str = "Error recording vote. Please try again later.";
pub const LOADING_TEXT: &str = "Processing your request... Please wait.";
pub const RESTART_TEXT: &str = "An error occurred. Please restart.";

const NAV_FOOTER: &str = "\n\n0. Back\n00. Main Menu";
const FALLBACK_NAME: &str = "Member";

pub fn balance_message(balance: Money) -> String {
    format!("Current pool balance is {balance}.")
}

pub fn contribution_thanks(amount: Money) -> String {
    format!("Thank you! Your contribution of {amount} has been recorded.")
}

pub fn claim_submitted_message(notice: Option<&str>) -> String {
    match notice {
        Some(notice) => format!("{CLAIM_SUBMITTED}\n{notice}"),
        None => CLAIM_SUBMITTED.to_string(),
    }
}

/// What a handset shows after a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Screen {
    pub text: String,
    pub accepting_input: bool,
}

impl Screen {
    pub fn of(menu: &MenuController, group: &Group) -> Self {
        Self {
            text: render(menu, group),
            accepting_input: menu.accepting_input(),
        }
    }
}

/// Renders the current screen of `menu` against `group`
pub fn render(menu: &MenuController, group: &Group) -> String {
    let money = |amount| Money::new(amount, group.currency());
    let drafts = menu.drafts();
    let notice = menu
        .message()
        .map(|m| format!("{m}\n\n"))
        .unwrap_or_default();

    let body = match menu.state() {
        MenuState::Loading => return LOADING_TEXT.to_string(),
        MenuState::Main => {
            return format!(
                "{}Reply with:\n\
                 1. Check Pool Balance\n\
                 2. File a Claim\n\
                 3. Vote on Pending Claim\n\
                 4. Make Contribution\n\
                 5. My Claim Status",
                welcome(menu, group)
            );
        }
        MenuState::MyClaimsList => {
            let claims = group.claims_by(menu.context().member_id);
            let listing = if claims.is_empty() {
                "You have not submitted any claims.".to_string()
            } else {
                let lines: Vec<String> = claims
                    .iter()
                    .enumerate()
                    .map(|(i, c)| format!("{}. {} - {}", i + 1, money(c.amount()), c.status()))
                    .collect();
                format!("Your Claims:\n{}", lines.join("\n"))
            };
            return format!("{}{listing}{NAV_FOOTER}", welcome(menu, group));
        }
        MenuState::FileClaimAmount => {
            format!("Please enter the claim amount ({}):", group.currency().code())
        }
        MenuState::FileClaimDesc => match drafts.claim_amount {
            Some(amount) => format!(
                "Amount: {}\n\nPlease enter a brief description of the claim:",
                money(amount)
            ),
            None => return RESTART_TEXT.to_string(),
        },
        MenuState::FileClaimConfirm => {
            match (drafts.claim_amount, drafts.claim_description.as_deref()) {
                (Some(amount), Some(description)) => format!(
                    "Confirm Claim:\nAmount: {}\nDescription: {description}\n\n1. Confirm\n2. Cancel",
                    money(amount)
                ),
                _ => return RESTART_TEXT.to_string(),
            }
        }
        MenuState::ContributeAmount => {
            format!("Enter contribution amount ({}):", group.currency().code())
        }
        MenuState::ContributeConfirm => match drafts.contribution_amount {
            Some(amount) => format!(
                "You are about to contribute {}.\n\n1. Confirm\n2. Cancel",
                money(amount)
            ),
            None => return RESTART_TEXT.to_string(),
        },
        MenuState::VoteList => {
            let lines: Vec<String> = drafts
                .vote_list
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{}. {} - {}", i + 1, c.claimant_name, money(c.amount)))
                .collect();
            format!("Select a claim to vote on:\n{}", lines.join("\n"))
        }
        MenuState::VoteConfirm => match &drafts.selected_claim {
            Some(claim) => format!(
                "Vote on claim from {} for {}?\nReason: \"{}\"\n\n1. Approve\n2. Deny",
                claim.claimant_name,
                money(claim.amount),
                claim.description
            ),
            None => return "Error: No claim selected.".to_string(),
        },
    };

    format!("{notice}{body}{NAV_FOOTER}")
}

fn welcome(menu: &MenuController, group: &Group) -> String {
    let name = group
        .member(menu.context().member_id)
        .map(|m| m.name.as_str())
        .unwrap_or(FALLBACK_NAME);
    match menu.message() {
        Some(message) => format!("Welcome, {name}.\n\n{message}\n\n"),
        None => format!("Welcome, {name}.\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::SessionContext;
    use core_kernel::{Currency, MemberId, SequentialIdGenerator};
    use domain_pool::seed::{demo_current_member, demo_group, DEMO_GROUP_NAME};

    fn setup() -> (MenuController, Group) {
        let ids = SequentialIdGenerator::new();
        let group = demo_group(&ids, DEMO_GROUP_NAME, Currency::KES).unwrap();
        let member = demo_current_member(&group).unwrap();
        (MenuController::new(SessionContext::new(member)), group)
    }

    #[test]
    fn test_main_menu() {
        let (menu, group) = setup();
        let text = render(&menu, &group);

        assert!(text.starts_with("Welcome, James Kariuki.\nReply with:\n1. Check Pool Balance"));
        assert!(text.ends_with("5. My Claim Status"));
        assert!(!text.contains("00. Main Menu"));
    }

    #[test]
    fn test_main_menu_with_message() {
        let (mut menu, group) = setup();
        menu.handle("1", &group);

        assert_eq!(
            render(&menu, &group),
            "Welcome, James Kariuki.\n\nCurrent pool balance is KES 2,500.\n\nReply with:\n\
             1. Check Pool Balance\n2. File a Claim\n3. Vote on Pending Claim\n\
             4. Make Contribution\n5. My Claim Status"
        );
    }

    #[test]
    fn test_unknown_member_greeted_generically() {
        let (_, group) = setup();
        let stranger = MemberId::generate(&SequentialIdGenerator::starting_at(9_000));
        let menu = MenuController::new(SessionContext::new(stranger));

        assert!(render(&menu, &group).starts_with("Welcome, Member.\n"));
    }

    #[test]
    fn test_sub_screens_carry_footer() {
        let (mut menu, group) = setup();
        menu.handle("4", &group);
        assert_eq!(render(&menu, &group), "Enter contribution amount (KES):\n\n0. Back\n00. Main Menu");

        menu.handle("1500", &group);
        assert_eq!(
            render(&menu, &group),
            "You are about to contribute KES 1,500.\n\n1. Confirm\n2. Cancel\n\n0. Back\n00. Main Menu"
        );
    }

    #[test]
    fn test_inline_error_above_screen() {
        let (mut menu, group) = setup();
        menu.handle("2", &group);
        menu.handle("lots", &group);

        assert_eq!(
            render(&menu, &group),
            "Invalid amount. Please enter a number.\n\n\
             Please enter the claim amount (KES):\n\n0. Back\n00. Main Menu"
        );
    }

    #[test]
    fn test_vote_screens() {
        let (mut menu, group) = setup();
        menu.handle("3", &group);
        assert!(render(&menu, &group).starts_with("Select a claim to vote on:\n1. Peter Musyoka - KES 500"));

        menu.handle("1", &group);
        let text = render(&menu, &group);
        assert!(text.starts_with("Vote on claim from Peter Musyoka for KES 500?\nReason: \""));
        assert!(text.contains("1. Approve\n2. Deny"));
    }

    #[test]
    fn test_my_claims_listing() {
        let (mut menu, group) = setup();
        menu.handle("5", &group);
        let text = render(&menu, &group);

        assert!(text.contains("You have not submitted any claims."));
        assert!(text.ends_with("0. Back\n00. Main Menu"));
    }

    #[test]
    fn test_loading_screen() {
        let (mut menu, group) = setup();
        for input in ["2", "500", "Snapped clutch cable", "1"] {
            menu.handle(input, &group);
        }
        let screen = Screen::of(&menu, &group);

        assert_eq!(screen.text, LOADING_TEXT);
        assert!(!screen.accepting_input);
    }

    #[test]
    fn test_submitted_message_with_notice() {
        assert_eq!(
            claim_submitted_message(Some("AI could not assess the claim.")),
            "Claim submitted successfully. It will be reviewed.\nAI could not assess the claim."
        );
    }
}
