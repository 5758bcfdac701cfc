//! Database models for the two todo variants.
//!
//! Both variants share the owner/title/visibility/completion core; daily
//! todos carry scheduling detail for a specific day, due-date todos carry a
//! deadline and an importance level.

use crate::auth::ownership::Owned;
use crate::types::{CategoryId, Importance, Resource, TodoId, UserId};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database request for creating a daily todo.
///
/// `is_finished` is intentionally absent: new todos always start unfinished.
#[derive(Debug, Clone)]
pub struct DailyTodoCreateDBRequest {
    pub user_id: UserId,
    pub title: String,
    pub is_public: bool,
    pub description: Option<String>,
    pub daily_date: NaiveDate,
    pub target_time: Option<NaiveTime>,
    pub alarm: Option<NaiveTime>,
    pub place: Option<String>,
    pub people: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// Database request for updating a daily todo (full replace)
#[derive(Debug, Clone)]
pub struct DailyTodoUpdateDBRequest {
    pub title: String,
    pub is_public: bool,
    pub is_finished: bool,
    pub description: Option<String>,
    pub daily_date: NaiveDate,
    pub target_time: Option<NaiveTime>,
    pub alarm: Option<NaiveTime>,
    pub place: Option<String>,
    pub people: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// Database response for a daily todo
#[derive(Debug, Clone, FromRow)]
pub struct DailyTodoDBResponse {
    pub id: TodoId,
    pub user_id: UserId,
    pub title: String,
    pub is_public: bool,
    pub is_finished: bool,
    pub description: Option<String>,
    pub daily_date: NaiveDate,
    pub target_time: Option<NaiveTime>,
    pub alarm: Option<NaiveTime>,
    pub place: Option<String>,
    pub people: Option<String>,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for DailyTodoDBResponse {
    const RESOURCE: Resource = Resource::DailyTodo;

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.user_id
    }
}

/// Database request for creating a due-date todo.
#[derive(Debug, Clone)]
pub struct DueDateTodoCreateDBRequest {
    pub user_id: UserId,
    pub title: String,
    pub is_public: bool,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub importance: Importance,
    pub category_id: Option<CategoryId>,
}

/// Database request for updating a due-date todo (full replace)
#[derive(Debug, Clone)]
pub struct DueDateTodoUpdateDBRequest {
    pub title: String,
    pub is_public: bool,
    pub is_finished: bool,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub importance: Importance,
    pub category_id: Option<CategoryId>,
}

/// Database response for a due-date todo
#[derive(Debug, Clone, FromRow)]
pub struct DueDateTodoDBResponse {
    pub id: TodoId,
    pub user_id: UserId,
    pub title: String,
    pub is_public: bool,
    pub is_finished: bool,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub importance: Importance,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for DueDateTodoDBResponse {
    const RESOURCE: Resource = Resource::DueDateTodo;

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.user_id
    }
}
