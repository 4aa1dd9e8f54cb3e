//! Error types for logbook operations
use store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogbookError {
    /// A required field was empty.
    #[error("{0}")]
    Validation(&'static str),

    /// Unknown user or entry, inactive user, or an entry owned by someone else.
    #[error("Not found")]
    NotFound,

    #[error("Invalid user or password")]
    InvalidCredentials,

    #[error("Password hash error: {reason}")]
    PasswordHash { reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LogbookError {
    /// Whether this error means the login attempt was refused.
    ///
    /// Unknown users and wrong passwords are deliberately indistinguishable to the caller.
    pub fn is_login_failure(&self) -> bool {
        matches!(self, LogbookError::NotFound | LogbookError::InvalidCredentials)
    }
}
