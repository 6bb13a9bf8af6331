//! USSD menu channel
//!
//! A numeric, session-driven menu over the [`domain_pool::PoolService`],
//! as a feature phone would see it:
//!
//! - [`menu`]: the synchronous menu state machine
//! - [`screens`]: screen texts
//! - [`session`]: the async driver and the session registry

pub mod error;
pub mod menu;
pub mod screens;
pub mod session;

pub use error::UssdError;
pub use menu::{
    ClaimSummary, Drafts, FilingOutcome, MenuCommand, MenuController, MenuState, SessionContext,
    Ticket, Transition, BACK, MAIN_MENU,
};
pub use screens::{render, Screen};
pub use session::{SessionRegistry, UssdSession, DEFAULT_IDLE_TIMEOUT};
