//! USSD channel DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::MemberId;
use interface_ussd::Screen;

#[derive(Debug, Deserialize, Validate)]
pub struct UssdRequest {
    #[validate(length(min = 1, max = 128))]
    pub session_id: String,
    pub member_id: MemberId,
    /// Empty text shows the current screen
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct UssdResponse {
    pub screen: String,
    pub accepting_input: bool,
}

impl From<Screen> for UssdResponse {
    fn from(screen: Screen) -> Self {
        Self {
            screen: screen.text,
            accepting_input: screen.accepting_input,
        }
    }
}
