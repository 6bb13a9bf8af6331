//! Pool domain errors

use thiserror::Error;

use core_kernel::MoneyError;
use domain_claims::ClaimError;

/// Errors that can occur in the pool domain
#[derive(Debug, Error)]
pub enum PoolError {
    /// Rejected user input (amounts, descriptions)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Member is not part of the group
    #[error("Unknown member: {0}")]
    UnknownMember(String),

    /// Claim not found in the group
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    /// Operation not allowed in the claim's current status
    #[error("Illegal transition: {0}")]
    IllegalTransition(String),

    /// The group kept changing underneath an update
    #[error("Group was modified concurrently; gave up after {attempts} attempts")]
    ConcurrentModification { attempts: usize },

    /// Claim aggregate error
    #[error(transparent)]
    Claim(#[from] ClaimError),
}

impl PoolError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        PoolError::InvalidInput(message.into())
    }

    /// Returns true for errors caused by the caller's input
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PoolError::InvalidInput(_) | PoolError::Claim(ClaimError::InvalidInput(_))
        )
    }
}

impl From<MoneyError> for PoolError {
    fn from(err: MoneyError) -> Self {
        PoolError::InvalidInput(err.to_string())
    }
}
