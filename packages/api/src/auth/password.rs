//! Credential checks for the login form.
//!
//! Accounts are provisioned out of band, so `logbook_user.password_hash` holds
//! whatever the operator's tooling wrote. Two adaptive schemes are understood,
//! told apart by the hash prefix:
//!
//! | Prefix | Scheme |
//! |--------|--------|
//! | `$2a$`, `$2b$`, `$2y$` | bcrypt (what [`hash_password`] writes) |
//! | `$argon2` | Argon2 PHC string |
//!
//! Anything else is a malformed hash and fails loudly rather than silently
//! refusing the login.

use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};

use crate::error::LogbookError;

/// Verified against when the user does not exist, so that path costs one full
/// bcrypt round at the default cost. Nothing hashes to it.
const DUMMY_HASH: &str = "$2b$12$to.C5vLsAdNr1e3ulj9sYOIm/aakmIW.J5hZKKFb1ly6mnItBIVJ.";

enum Scheme {
    Bcrypt,
    Argon2,
}

fn scheme(hash: &str) -> Option<Scheme> {
    if ["$2a$", "$2b$", "$2y$"].iter().any(|p| hash.starts_with(p)) {
        Some(Scheme::Bcrypt)
    } else if hash.starts_with("$argon2") {
        Some(Scheme::Argon2)
    } else {
        None
    }
}

fn malformed(e: impl std::fmt::Display) -> LogbookError {
    LogbookError::PasswordHash {
        reason: format!("Invalid password hash: {e}"),
    }
}

/// bcrypt hash of `password` at the default cost.
pub fn hash_password(password: &str) -> Result<String, LogbookError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| LogbookError::PasswordHash {
        reason: format!("Failed to hash password: {e}"),
    })
}

/// Check `password` against a stored bcrypt or Argon2 hash.
///
/// `Ok(false)` is a wrong password; `Err` means the stored hash is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, LogbookError> {
    match scheme(hash) {
        Some(Scheme::Bcrypt) => bcrypt::verify(password, hash).map_err(malformed),
        Some(Scheme::Argon2) => {
            let parsed = PasswordHash::new(hash).map_err(malformed)?;
            Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok())
        }
        None => Err(malformed("unknown scheme")),
    }
}

/// Spend one verification's worth of work on a password that cannot match.
pub fn burn_verification(password: &str) {
    let _ = bcrypt::verify(password, DUMMY_HASH);
}
