//! USSD channel errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UssdError {
    #[error("Unknown member: {0}")]
    UnknownMember(String),

    #[error("Invalid session: {0}")]
    InvalidSession(String),
}
