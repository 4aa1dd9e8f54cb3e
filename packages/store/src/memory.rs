use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::models::{Entry, EntryDraft, User};
use crate::repo::{EntryQuery, LogbookStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    entries: Vec<Entry>,
}

/// In-memory LogbookStore for testing.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Create a user out of band, the way an operator would with SQL.
    pub fn add_user(
        &self,
        username: &str,
        password_hash: &str,
        display_name: &str,
        active: bool,
    ) -> Result<User, StoreError> {
        let mut tables = self.tables()?;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(StoreError::Unavailable(format!(
                "duplicate username {username}"
            )));
        }
        let user = User {
            id: tables.users.len() as i64 + 1,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            display_name: display_name.to_string(),
            active,
            created_at: Utc::now(),
            last_login_at: None,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    /// Number of stored entries across all users.
    pub fn entry_count(&self) -> usize {
        self.tables().map(|t| t.entries.len()).unwrap_or_default()
    }
}

impl LogbookStore for MemoryStore {
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables()?;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn touch_last_login(&self, user_id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn list_entries(&self, query: &EntryQuery<'_>) -> Result<Vec<Entry>, StoreError> {
        let tables = self.tables()?;
        let mut entries: Vec<Entry> = tables
            .entries
            .iter()
            .filter(|e| e.user_id == query.user_id)
            .filter(|e| query.include_private || !e.private)
            .filter(|e| query.tag.map_or(true, |tag| e.has_tag(tag)))
            .cloned()
            .collect();

        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(entries
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn get_entry(&self, user_id: i64, uuid: Uuid) -> Result<Option<Entry>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .entries
            .iter()
            .find(|e| e.uuid == uuid && e.user_id == user_id)
            .cloned())
    }

    async fn insert_entry(&self, user_id: i64, draft: &EntryDraft) -> Result<Entry, StoreError> {
        let mut tables = self.tables()?;
        let now = Utc::now();
        let entry = Entry {
            id: tables.entries.len() as i64 + 1,
            uuid: Uuid::new_v4(),
            title: draft.title.clone(),
            url: draft.url.clone(),
            notes: draft.notes.clone(),
            private: draft.private,
            user_id,
            tags: draft.tags.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.entries.push(entry.clone());
        Ok(entry)
    }

    async fn update_entry(&self, entry: &Entry) -> Result<Entry, StoreError> {
        let mut tables = self.tables()?;
        let stored = tables
            .entries
            .iter_mut()
            .find(|e| e.id == entry.id && e.user_id == entry.user_id)
            .ok_or_else(|| StoreError::Unavailable(format!("entry {} vanished", entry.uuid)))?;

        stored.title = entry.title.clone();
        stored.url = entry.url.clone();
        stored.notes = entry.notes.clone();
        stored.private = entry.private;
        stored.tags = entry.tags.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, tags: &str, private: bool) -> EntryDraft {
        EntryDraft::new(title, "", "", tags, private)
    }

    fn query(user_id: i64) -> EntryQuery<'static> {
        EntryQuery {
            user_id,
            include_private: true,
            tag: None,
            offset: 0,
            limit: 100,
        }
    }

    #[tokio::test]
    async fn test_find_user() {
        let store = MemoryStore::new();
        store.add_user("alice", "hash", "Alice", true).unwrap();

        let alice = store.find_user("alice").await.unwrap().unwrap();
        assert_eq!(alice.display_name, "Alice");
        assert!(store.find_user("Alice").await.unwrap().is_none());
        assert!(store.add_user("alice", "hash", "Again", true).is_err());
    }

    #[tokio::test]
    async fn test_newest_first() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", "hash", "Alice", true).unwrap();

        for title in ["first", "second", "third"] {
            store.insert_entry(alice.id, &draft(title, "", false)).await.unwrap();
        }

        let titles: Vec<String> = store
            .list_entries(&query(alice.id))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_filters() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", "hash", "Alice", true).unwrap();
        let bob = store.add_user("bob", "hash", "Bob", true).unwrap();

        store.insert_entry(alice.id, &draft("go", "go", false)).await.unwrap();
        store.insert_entry(alice.id, &draft("golang", "golang", false)).await.unwrap();
        store.insert_entry(alice.id, &draft("secret", "go", true)).await.unwrap();
        store.insert_entry(bob.id, &draft("bob's", "go", false)).await.unwrap();

        // Only alice's rows
        assert_eq!(store.list_entries(&query(alice.id)).await.unwrap().len(), 3);

        // Public only
        let public = EntryQuery {
            include_private: false,
            ..query(alice.id)
        };
        assert_eq!(public_titles(&store, &public).await, vec!["golang", "go"]);

        // Exact tag match, no substring
        let tagged = EntryQuery {
            tag: Some("go"),
            ..public
        };
        assert_eq!(public_titles(&store, &tagged).await, vec!["go"]);
    }

    async fn public_titles(store: &MemoryStore, query: &EntryQuery<'_>) -> Vec<String> {
        store
            .list_entries(query)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect()
    }

    #[tokio::test]
    async fn test_get_entry_is_owner_scoped() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", "hash", "Alice", true).unwrap();
        let bob = store.add_user("bob", "hash", "Bob", true).unwrap();

        let entry = store.insert_entry(alice.id, &draft("mine", "", false)).await.unwrap();

        assert!(store.get_entry(alice.id, entry.uuid).await.unwrap().is_some());
        assert!(store.get_entry(bob.id, entry.uuid).await.unwrap().is_none());
        assert!(store.get_entry(alice.id, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_entry() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", "hash", "Alice", true).unwrap();

        let mut entry = store.insert_entry(alice.id, &draft("old", "a", false)).await.unwrap();
        entry.apply(draft("new", "b, c", true));

        let updated = store.update_entry(&entry).await.unwrap();
        assert_eq!(updated.title, "new");
        assert_eq!(updated.tags, vec!["b", "c"]);
        assert!(updated.private);
        assert_eq!(updated.created_at, entry.created_at);
        assert!(updated.updated_at >= entry.updated_at);
        assert_eq!(store.entry_count(), 1);
    }
}
