//! # API crate: authentication, entry queries and storage for Logbook
//!
//! Everything the web frontend needs below the HTTP layer lives here.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Argon2id password hashing, typed session access, CSRF tokens |
//! | [`db`] | PostgreSQL pool, embedded migrations, and [`db::PgStore`] |
//! | [`error`] | [`LogbookError`], the error every service operation returns |
//! | [`logbook`] | The [`Logbook`] service: login, visibility-scoped listings, entry writes |
//! | [`settings`] | Layered configuration (`config.toml`, environment, `LOGBOOK_STORE_KEY`) |

pub mod auth;
pub mod db;
pub mod error;
pub mod logbook;
pub mod settings;

pub use error::LogbookError;
pub use logbook::Logbook;
pub use settings::Settings;

pub use store::{Entry, EntryDraft, Identity, Page, Profile};
