//! Session gate and session layer setup.
//!
//! Two extractors sit between a request and its handler:
//!
//! - [`AuthSession`]: for `/logbook` routes. Yields the signed-in [`Identity`] or
//!   redirects to `/login` when there is none (or it cannot be read).
//! - [`Viewer`]: for public pages. The identity is optional.
//!
//! Both carry the session's CSRF token so rendered forms can embed it. Anonymous
//! visitors get a token only from pages that show a form (see
//! [`Viewer::issue_csrf`]), so browsing public pages stores no session.

use api::auth;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use sha2::{Digest, Sha512};
use store::Identity;
use time::Duration;
use tower_sessions::{
    cookie::{Key, SameSite},
    Expiry, Session, SessionManagerLayer, SessionStore,
};
use tracing::warn;

use crate::error::AppError;
use crate::views::PageContext;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "logbook_session";

/// Build the cookie-signing key from the configured secret.
///
/// The secret may have any length; SHA-512 stretches or folds it to the 64 bytes
/// the signing key needs.
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Session layer over `store` with a signed, `SameSite=Lax` cookie and a 7 day
/// inactivity expiry.
pub fn session_layer<St: SessionStore + Clone>(
    store: St,
    secret: &str,
    secure: bool,
) -> SessionManagerLayer<St, tower_sessions::service::SignedCookie> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE)
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)))
        .with_signed(signing_key(secret))
}

/// Map a session to the identity it carries, or a redirect to the login page.
pub async fn require_session(session: &Session) -> Result<Identity, Redirect> {
    match auth::current_identity(session).await {
        Ok(Some(identity)) => Ok(identity),
        Ok(None) => Err(Redirect::to("/login")),
        Err(e) => {
            warn!(error = %e, "unreadable session, sending to login");
            Err(Redirect::to("/login"))
        }
    }
}

/// Reject the submission unless its CSRF token matches the session's.
pub async fn verify_csrf(session: &Session, submitted: &str) -> Result<(), AppError> {
    if auth::csrf_matches(session, submitted).await? {
        Ok(())
    } else {
        warn!("rejected form with a bad CSRF token");
        Err(AppError::Forbidden)
    }
}

async fn session_from_parts<S: Send + Sync>(parts: &mut Parts, state: &S) -> Result<Session, Response> {
    Session::from_request_parts(parts, state)
        .await
        .map_err(IntoResponse::into_response)
}

/// A request from a signed-in user.
pub struct AuthSession {
    pub identity: Identity,
    pub csrf: String,
    pub session: Session,
}

impl AuthSession {
    pub fn context(&self) -> PageContext {
        PageContext {
            identity: Some(self.identity.clone()),
            csrf: self.csrf.clone(),
        }
    }
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state).await?;
        let identity = require_session(&session)
            .await
            .map_err(IntoResponse::into_response)?;
        let csrf = auth::csrf_token(&session)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(Self {
            identity,
            csrf,
            session,
        })
    }
}

/// A request that may or may not come from a signed-in user.
pub struct Viewer {
    pub identity: Option<Identity>,
    pub csrf: String,
    pub session: Session,
}

impl Viewer {
    /// Make sure the page about to be rendered has a CSRF token, starting a
    /// session if needed.
    pub async fn issue_csrf(&mut self) -> Result<(), AppError> {
        if self.csrf.is_empty() {
            self.csrf = auth::csrf_token(&self.session).await?;
        }
        Ok(())
    }

    pub fn context(&self) -> PageContext {
        PageContext {
            identity: self.identity.clone(),
            csrf: self.csrf.clone(),
        }
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state).await?;
        let identity = match auth::current_identity(&session).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, "unreadable session, treating as anonymous");
                None
            }
        };
        // Signed-in pages carry the logout form
        let csrf = match identity {
            Some(_) => auth::csrf_token(&session)
                .await
                .map_err(|e| AppError::from(e).into_response())?,
            None => String::new(),
        };

        Ok(Self {
            identity,
            csrf,
            session,
        })
    }
}
