pub mod models;
pub mod page;
pub mod repo;

mod memory;
pub use memory::MemoryStore;

pub use models::{parse_tags, Entry, EntryDraft, Identity, Profile, User};
pub use page::{Page, ENTRIES_PER_PAGE};
pub use repo::{EntryQuery, LogbookStore, StoreError};
