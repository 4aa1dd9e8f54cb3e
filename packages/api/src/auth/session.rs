//! Session keys and typed access to the session payload.
//!
//! The session only ever holds an [`Identity`] and a CSRF token. Reading the
//! identity back deserializes it into the typed structure; anything that does
//! not fit is treated as "not logged in" by the caller.

use rand::RngCore;
use store::Identity;
use tower_sessions::Session;

/// Key for storing the logged in identity in session.
pub const SESSION_USER_KEY: &str = "user";

/// Key for storing the per-session CSRF token.
pub const SESSION_CSRF_KEY: &str = "csrf";

/// Start an authenticated session for `identity`.
///
/// The session id is cycled first so a pre-login id cannot be reused.
pub async fn sign_in(session: &Session, identity: &Identity) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, identity).await
}

/// Drop everything held in the session, including the identity.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// The identity stored in the session, if any.
pub async fn current_identity(
    session: &Session,
) -> Result<Option<Identity>, tower_sessions::session::Error> {
    session.get::<Identity>(SESSION_USER_KEY).await
}

/// The session's CSRF token, creating one on first use.
pub async fn csrf_token(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(token) = session.get::<String>(SESSION_CSRF_KEY).await? {
        return Ok(token);
    }
    let token = new_token();
    session.insert(SESSION_CSRF_KEY, &token).await?;
    Ok(token)
}

/// Whether `submitted` matches the session's CSRF token.
pub async fn csrf_matches(
    session: &Session,
    submitted: &str,
) -> Result<bool, tower_sessions::session::Error> {
    let expected = session.get::<String>(SESSION_CSRF_KEY).await?;
    Ok(matches!(expected, Some(token) if !submitted.is_empty() && constant_eq(&token, submitted)))
}

fn new_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn constant_eq(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .bytes()
            .zip(b.bytes())
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}
