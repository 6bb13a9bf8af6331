//! Request and response bodies

pub mod claims;
pub mod group;
pub mod ussd;
