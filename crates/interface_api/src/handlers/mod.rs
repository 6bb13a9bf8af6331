//! Request handlers

pub mod claims;
pub mod contributions;
pub mod group;
pub mod health;
pub mod ussd;
