//! # Logbook service: authentication and entry access rules
//!
//! [`Logbook`] wraps a [`LogbookStore`] and is the only place that decides who may
//! see or change what:
//!
//! | Method | Rule |
//! |--------|------|
//! | [`authenticate`](Logbook::authenticate) | Empty fields are a validation error; unknown or inactive users are `NotFound`; a wrong password is `InvalidCredentials`. |
//! | [`list_entries`](Logbook::list_entries) | The owner sees everything, anyone else sees public entries of active users only. |
//! | [`list_own_entries`](Logbook::list_own_entries) | The signed-in user's full logbook. |
//! | [`get_entry`](Logbook::get_entry) | Owner-scoped lookup by uuid. |
//! | [`create_entry`](Logbook::create_entry) / [`update_entry`](Logbook::update_entry) | Title must be non-empty; only the owner may update. |

use store::{Entry, EntryDraft, EntryQuery, Identity, LogbookStore, Page, Profile};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{burn_verification, verify_password};
use crate::error::LogbookError;

pub struct Logbook<S> {
    store: S,
}

impl<S: LogbookStore> Logbook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check a username and password, returning the identity to keep in the session.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, LogbookError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(LogbookError::Validation("Username and Password are required."));
        }

        let user = match self.store.find_user(username).await? {
            Some(user) if user.active => user,
            _ => {
                burn_verification(password);
                warn!(username, "login refused: unknown or inactive user");
                return Err(LogbookError::NotFound);
            }
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(username, "login refused: wrong password");
            return Err(LogbookError::InvalidCredentials);
        }

        if let Err(e) = self.store.touch_last_login(user.id).await {
            warn!(username, error = %e, "failed to record last login");
        }

        info!(username, "login");
        Ok(user.identity())
    }

    /// Public profile of an active user.
    pub async fn find_profile(&self, username: &str) -> Result<Profile, LogbookError> {
        match self.store.find_user(username).await? {
            Some(user) if user.active => Ok(user.to_profile()),
            _ => Err(LogbookError::NotFound),
        }
    }

    /// Entries of `username` as seen by `viewer`, newest first.
    ///
    /// Unknown and inactive users yield an empty page rather than an error.
    pub async fn list_entries(
        &self,
        viewer: Option<&Identity>,
        username: &str,
        tag: Option<&str>,
        page: Page,
    ) -> Result<Vec<Entry>, LogbookError> {
        let Some(user) = self.store.find_user(username).await? else {
            return Ok(Vec::new());
        };

        let is_owner = viewer.is_some_and(|v| v.user_id == user.id);
        if !is_owner && !user.active {
            return Ok(Vec::new());
        }

        self.query(user.id, is_owner, tag, page).await
    }

    /// The signed-in user's own entries, private ones included.
    pub async fn list_own_entries(
        &self,
        owner: &Identity,
        tag: Option<&str>,
        page: Page,
    ) -> Result<Vec<Entry>, LogbookError> {
        self.query(owner.user_id, true, tag, page).await
    }

    async fn query(
        &self,
        user_id: i64,
        include_private: bool,
        tag: Option<&str>,
        page: Page,
    ) -> Result<Vec<Entry>, LogbookError> {
        let query = EntryQuery {
            user_id,
            include_private,
            tag: tag.map(str::trim).filter(|t| !t.is_empty()),
            offset: page.offset(),
            limit: page.limit(),
        };
        Ok(self.store.list_entries(&query).await?)
    }

    /// One of the owner's entries by its uuid.
    pub async fn get_entry(&self, owner: &Identity, uuid: &str) -> Result<Entry, LogbookError> {
        let uuid = Uuid::parse_str(uuid).map_err(|_| LogbookError::NotFound)?;
        self.store
            .get_entry(owner.user_id, uuid)
            .await?
            .ok_or(LogbookError::NotFound)
    }

    pub async fn create_entry(&self, owner: &Identity, draft: EntryDraft) -> Result<Entry, LogbookError> {
        if let Some(problem) = draft.problem() {
            return Err(LogbookError::Validation(problem));
        }

        let entry = self.store.insert_entry(owner.user_id, &draft).await?;
        info!(username = %owner.username, uuid = %entry.uuid, "entry created");
        Ok(entry)
    }

    pub async fn update_entry(
        &self,
        owner: &Identity,
        uuid: &str,
        draft: EntryDraft,
    ) -> Result<Entry, LogbookError> {
        let mut entry = self.get_entry(owner, uuid).await?;
        if let Some(problem) = draft.problem() {
            return Err(LogbookError::Validation(problem));
        }

        entry.apply(draft);
        let entry = self.store.update_entry(&entry).await?;
        info!(username = %owner.username, uuid = %entry.uuid, "entry updated");
        Ok(entry)
    }
}
