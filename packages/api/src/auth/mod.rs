//! Authentication: password hashing and session management.

mod password;
mod session;

pub use password::{burn_verification, hash_password, verify_password};
pub use session::{
    csrf_matches, csrf_token, current_identity, sign_in, sign_out, SESSION_CSRF_KEY,
    SESSION_USER_KEY,
};
