//! API request/response models for the two todo variants.

use crate::api::models::categories::CategoryResponse;
use crate::db::models::todos::{DailyTodoDBResponse, DueDateTodoDBResponse};
use crate::types::{CategoryId, DueDateSort, Importance, TodoId};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Create a daily todo. Completion state is not accepted: new todos always
/// start unfinished.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DailyTodoCreateRequest {
    pub title: String,
    #[serde(default)]
    pub is_public: bool,
    pub description: Option<String>,
    pub daily_date: NaiveDate,
    pub target_time: Option<NaiveTime>,
    pub alarm: Option<NaiveTime>,
    pub place: Option<String>,
    pub people: Option<String>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// Replace a daily todo. Every field is written; omitted optionals clear
/// their columns and the hashtag list replaces the existing set.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DailyTodoModifyRequest {
    pub title: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_finished: bool,
    pub description: Option<String>,
    pub daily_date: NaiveDate,
    pub target_time: Option<NaiveTime>,
    pub alarm: Option<NaiveTime>,
    pub place: Option<String>,
    pub people: Option<String>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyTodoResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: TodoId,
    pub title: String,
    pub is_public: bool,
    pub is_finished: bool,
    pub description: Option<String>,
    pub daily_date: NaiveDate,
    pub target_time: Option<NaiveTime>,
    pub alarm: Option<NaiveTime>,
    pub place: Option<String>,
    pub people: Option<String>,
    pub category: Option<CategoryResponse>,
    pub hashtags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyTodoResponse {
    pub fn from_parts(db: DailyTodoDBResponse, category: Option<CategoryResponse>, hashtags: Vec<String>) -> Self {
        Self {
            id: db.id,
            title: db.title,
            is_public: db.is_public,
            is_finished: db.is_finished,
            description: db.description,
            daily_date: db.daily_date,
            target_time: db.target_time,
            alarm: db.alarm,
            place: db.place,
            people: db.people,
            category,
            hashtags,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Create a due-date todo.
///
/// `importance` is free text validated against the importance enum; an
/// unrecognized value fails the request rather than defaulting.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DueDateTodoCreateRequest {
    pub title: String,
    #[serde(default)]
    pub is_public: bool,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub importance: String,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// Replace a due-date todo (full replace, same rules as the daily variant)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DueDateTodoModifyRequest {
    pub title: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_finished: bool,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub importance: String,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DueDateTodoResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: TodoId,
    pub title: String,
    pub is_public: bool,
    pub is_finished: bool,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub importance: Importance,
    pub category: Option<CategoryResponse>,
    pub hashtags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DueDateTodoResponse {
    pub fn from_parts(db: DueDateTodoDBResponse, category: Option<CategoryResponse>, hashtags: Vec<String>) -> Self {
        Self {
            id: db.id,
            title: db.title,
            is_public: db.is_public,
            is_finished: db.is_finished,
            description: db.description,
            due_date: db.due_date,
            importance: db.importance,
            category,
            hashtags,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Response for a newly created todo of either variant
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TodoCreatedResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: TodoId,
}

/// Query parameters for listing daily todos
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DailyTodoListQuery {
    /// Calendar day to list todos for (YYYY-MM-DD)
    pub date: NaiveDate,
}

/// Query parameters for listing due-date todos
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DueDateTodoListQuery {
    /// Sort order: "due-date" (default) or "importance"
    #[serde(default)]
    pub sort: DueDateSort,
}
