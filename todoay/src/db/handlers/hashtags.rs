//! Database repository for hashtags and their attachment to todos.
//!
//! Hashtag rows are global and deduplicated by normalized name; each todo
//! variant has its own ordered link table. Attachment always replaces the
//! todo's whole link set, so re-attaching the same list is a no-op.

use crate::db::errors::Result;
use crate::types::{HashtagId, TodoId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Normalize a raw tag: trim whitespace, strip one leading '#', lowercase.
/// Returns None for tags that are empty after normalization.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let normalized = stripped.trim().to_lowercase();
    if normalized.is_empty() { None } else { Some(normalized) }
}

/// Normalize a list of raw tags, dropping empties and deduplicating while
/// preserving first-occurrence order.
fn normalize_tags(raw: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.iter()
        .filter_map(|tag| normalize_tag(tag))
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

pub struct Hashtags<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Hashtags<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert the hashtag row if missing and return its id either way.
    async fn ensure_hashtag(&mut self, name: &str) -> Result<HashtagId> {
        // The no-op DO UPDATE makes RETURNING yield the id on conflict too
        let id = sqlx::query_scalar::<_, HashtagId>(
            r#"
            INSERT INTO hashtags (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(id)
    }

    async fn replace_links(&mut self, link_table: &str, todo_id: TodoId, raw_names: &[String]) -> Result<Vec<String>> {
        let names = normalize_tags(raw_names);

        // Wholesale replacement keeps attachment idempotent
        sqlx::query(&format!("DELETE FROM {link_table} WHERE todo_id = $1"))
            .bind(todo_id)
            .execute(&mut *self.db)
            .await?;

        for (position, name) in names.iter().enumerate() {
            let hashtag_id = self.ensure_hashtag(name).await?;

            sqlx::query(&format!(
                "INSERT INTO {link_table} (todo_id, hashtag_id, position) VALUES ($1, $2, $3)"
            ))
            .bind(todo_id)
            .bind(hashtag_id)
            .bind(position as i32)
            .execute(&mut *self.db)
            .await?;
        }

        Ok(names)
    }

    async fn list_links(&mut self, link_table: &str, todo_id: TodoId) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(&format!(
            r#"
            SELECT h.name FROM hashtags h
            JOIN {link_table} l ON l.hashtag_id = h.id
            WHERE l.todo_id = $1
            ORDER BY l.position ASC
            "#
        ))
        .bind(todo_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(names)
    }

    /// Replace the hashtag set of a daily todo, returning the normalized names in order
    #[instrument(skip(self, raw_names), fields(todo_id = %abbrev_uuid(&todo_id), count = raw_names.len()), err)]
    pub async fn attach_to_daily(&mut self, todo_id: TodoId, raw_names: &[String]) -> Result<Vec<String>> {
        self.replace_links("daily_todo_hashtags", todo_id, raw_names).await
    }

    /// Replace the hashtag set of a due-date todo, returning the normalized names in order
    #[instrument(skip(self, raw_names), fields(todo_id = %abbrev_uuid(&todo_id), count = raw_names.len()), err)]
    pub async fn attach_to_due_date(&mut self, todo_id: TodoId, raw_names: &[String]) -> Result<Vec<String>> {
        self.replace_links("due_date_todo_hashtags", todo_id, raw_names).await
    }

    /// Hashtag names of a daily todo, in attachment order
    #[instrument(skip(self), fields(todo_id = %abbrev_uuid(&todo_id)), err)]
    pub async fn list_for_daily(&mut self, todo_id: TodoId) -> Result<Vec<String>> {
        self.list_links("daily_todo_hashtags", todo_id).await
    }

    /// Hashtag names of a due-date todo, in attachment order
    #[instrument(skip(self), fields(todo_id = %abbrev_uuid(&todo_id)), err)]
    pub async fn list_for_due_date(&mut self, todo_id: TodoId) -> Result<Vec<String>> {
        self.list_links("due_date_todo_hashtags", todo_id).await
    }
}
