//! Postgres-backed [`LogbookStore`].

use sqlx::PgPool;
use store::{Entry, EntryDraft, EntryQuery, LogbookStore, StoreError, User};
use uuid::Uuid;

/// Store over a shared connection pool. Cloning shares the pool.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn as_bigint(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl LogbookStore for PgStore {
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM logbook_user WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn touch_last_login(&self, user_id: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE logbook_user SET last_login_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_entries(&self, query: &EntryQuery<'_>) -> Result<Vec<Entry>, StoreError> {
        let entries: Vec<Entry> = sqlx::query_as(
            r#"
            SELECT * FROM logbook_entry
            WHERE user_id = $1
              AND ($2 OR NOT private)
              AND ($3::TEXT IS NULL OR $3 = ANY(tags))
            ORDER BY created_at DESC, id DESC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(query.user_id)
        .bind(query.include_private)
        .bind(query.tag)
        .bind(as_bigint(query.offset))
        .bind(as_bigint(query.limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    async fn get_entry(&self, user_id: i64, uuid: Uuid) -> Result<Option<Entry>, StoreError> {
        let entry: Option<Entry> = sqlx::query_as("SELECT * FROM logbook_entry WHERE user_id = $1 AND uuid = $2")
            .bind(user_id)
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    async fn insert_entry(&self, user_id: i64, draft: &EntryDraft) -> Result<Entry, StoreError> {
        let entry: Entry = sqlx::query_as(
            r#"
            INSERT INTO logbook_entry (uuid, title, url, notes, private, user_id, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.title)
        .bind(&draft.url)
        .bind(&draft.notes)
        .bind(draft.private)
        .bind(user_id)
        .bind(&draft.tags)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn update_entry(&self, entry: &Entry) -> Result<Entry, StoreError> {
        let entry: Entry = sqlx::query_as(
            r#"
            UPDATE logbook_entry
            SET title = $1, url = $2, notes = $3, private = $4, tags = $5, updated_at = NOW()
            WHERE id = $6 AND user_id = $7
            RETURNING *
            "#,
        )
        .bind(&entry.title)
        .bind(&entry.url)
        .bind(&entry.notes)
        .bind(entry.private)
        .bind(&entry.tags)
        .bind(entry.id)
        .bind(entry.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }
}
