//! # Domain models for users and logbook entries
//!
//! Defines the records the [`crate::LogbookStore`] reads and writes, plus the
//! lighter projections that cross the session and rendering boundaries.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`User`] | A full `logbook_user` row, including the password hash. Never rendered directly. |
//! | [`Entry`] | A full `logbook_entry` row: a captured URL and/or notes owned by one user. |
//! | [`Identity`] | The authenticated user as stored in the session: id, username, display name. |
//! | [`Profile`] | The public face of a [`User`]: no hash, no flags. |
//! | [`EntryDraft`] | The owner-editable part of an entry, as submitted by a form. |
//!
//! With the `sqlx` feature enabled, [`User`] and [`Entry`] derive `sqlx::FromRow` so
//! the Postgres store can load them straight from queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full user record from the database.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// The session identity for this user.
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
        }
    }

    /// Convert to a Profile for public pages.
    pub fn to_profile(&self) -> Profile {
        Profile {
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            created_at: self.created_at,
        }
    }
}

/// A captured note or URL made by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Entry {
    /// Internal row id, used only as the ordering tie-breaker.
    pub id: i64,
    /// Identifier exposed in URLs.
    pub uuid: Uuid,
    pub title: String,
    pub url: String,
    pub notes: String,
    pub private: bool,
    pub user_id: i64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Tags joined back into the form input representation.
    pub fn tags_input(&self) -> String {
        self.tags.join(", ")
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Overwrite the owner-editable fields with a validated draft.
    pub fn apply(&mut self, draft: EntryDraft) {
        self.title = draft.title;
        self.url = draft.url;
        self.notes = draft.notes;
        self.private = draft.private;
        self.tags = draft.tags;
    }
}

/// The authenticated user carried in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
}

impl Identity {
    /// Whether this identity owns the logbook of `username`.
    pub fn owns(&self, username: &str) -> bool {
        self.username == username
    }
}

/// User information safe to render on public pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Get display name, falling back to the username if it is blank.
    pub fn display_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

/// The fields an owner may set on an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryDraft {
    pub title: String,
    pub url: String,
    pub notes: String,
    pub private: bool,
    pub tags: Vec<String>,
}

impl EntryDraft {
    /// Build a draft from raw form values; `tags` is the comma separated input.
    pub fn new(title: &str, url: &str, notes: &str, tags: &str, private: bool) -> Self {
        Self {
            title: title.trim().to_string(),
            url: url.trim().to_string(),
            notes: notes.to_string(),
            private,
            tags: parse_tags(tags),
        }
    }

    /// Returns the reason the draft cannot be saved, if any.
    pub fn problem(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            return Some("Title is required.");
        }
        None
    }
}

/// Split a comma separated tag input into trimmed, non-empty, unique tags.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim) {
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}
