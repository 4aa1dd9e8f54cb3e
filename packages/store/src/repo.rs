//! # LogbookStore: the storage seam
//!
//! Every read and write the application performs goes through the [`LogbookStore`]
//! trait, so the same service logic runs against Postgres in production and the
//! in-memory [`crate::MemoryStore`] in tests.
//!
//! Implementations own the SQL (or its equivalent): exact-match tag filtering,
//! ordering by `created_at` descending with `id` descending as tie-breaker, and
//! offset/limit pagination. Deciding *who* may see private entries is not their
//! concern; callers say so through [`EntryQuery::include_private`].

use std::future::Future;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{Entry, EntryDraft, User};

/// Failure of the underlying data store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "sqlx")]
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Selection of one user's entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryQuery<'a> {
    pub user_id: i64,
    pub include_private: bool,
    /// Exact tag to match, `None` for all entries.
    pub tag: Option<&'a str>,
    pub offset: u64,
    pub limit: u64,
}

/// Async storage for users and their entries.
pub trait LogbookStore: Send + Sync {
    fn find_user(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Record a successful login.
    fn touch_last_login(&self, user_id: i64) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn list_entries(
        &self,
        query: &EntryQuery<'_>,
    ) -> impl Future<Output = Result<Vec<Entry>, StoreError>> + Send;

    /// Load an entry only if it belongs to `user_id`.
    fn get_entry(
        &self,
        user_id: i64,
        uuid: Uuid,
    ) -> impl Future<Output = Result<Option<Entry>, StoreError>> + Send;

    fn insert_entry(
        &self,
        user_id: i64,
        draft: &EntryDraft,
    ) -> impl Future<Output = Result<Entry, StoreError>> + Send;

    /// Persist the mutable fields of `entry` and refresh `updated_at`.
    fn update_entry(&self, entry: &Entry) -> impl Future<Output = Result<Entry, StoreError>> + Send;
}
