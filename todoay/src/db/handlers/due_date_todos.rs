//! Database repository for due-date todos.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::todos::{DueDateTodoCreateDBRequest, DueDateTodoDBResponse, DueDateTodoUpdateDBRequest},
};
use crate::types::{DueDateSort, TodoId, UserId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing due-date todos: all of the owner's todos in one of the
/// two supported sort orders.
#[derive(Debug, Clone)]
pub struct DueDateTodoFilter {
    pub user_id: UserId,
    pub sort: DueDateSort,
}

impl DueDateTodoFilter {
    pub fn new(user_id: UserId, sort: DueDateSort) -> Self {
        Self { user_id, sort }
    }
}

pub struct DueDateTodos<'c> {
    db: &'c mut PgConnection,
}

impl<'c> DueDateTodos<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for DueDateTodos<'c> {
    type CreateRequest = DueDateTodoCreateDBRequest;
    type UpdateRequest = DueDateTodoUpdateDBRequest;
    type Response = DueDateTodoDBResponse;
    type Id = TodoId;
    type Filter = DueDateTodoFilter;

    #[instrument(skip(self, request), fields(user_id = %abbrev_uuid(&request.user_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let todo_id = Uuid::new_v4();

        // New todos always start unfinished
        let todo = sqlx::query_as::<_, DueDateTodoDBResponse>(
            r#"
            INSERT INTO due_date_todos
                (id, user_id, title, is_public, is_finished, description, due_date, importance, category_id)
            VALUES ($1, $2, $3, $4, FALSE, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(todo_id)
        .bind(request.user_id)
        .bind(&request.title)
        .bind(request.is_public)
        .bind(&request.description)
        .bind(request.due_date)
        .bind(request.importance)
        .bind(request.category_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(todo)
    }

    #[instrument(skip(self), fields(todo_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let todo = sqlx::query_as::<_, DueDateTodoDBResponse>("SELECT * FROM due_date_todos WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(todo)
    }

    #[instrument(skip(self, filter), fields(user_id = %abbrev_uuid(&filter.user_id), sort = ?filter.sort), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        // Both orders are ascending and stable: creation time then id breaks ties.
        // The importance order comes from the postgres enum declaration (low < medium < high).
        let query = match filter.sort {
            DueDateSort::DueDate => {
                r#"
                SELECT * FROM due_date_todos
                WHERE user_id = $1
                ORDER BY due_date ASC, created_at ASC, id ASC
                "#
            }
            DueDateSort::Importance => {
                r#"
                SELECT * FROM due_date_todos
                WHERE user_id = $1
                ORDER BY importance ASC, created_at ASC, id ASC
                "#
            }
        };

        let todos = sqlx::query_as::<_, DueDateTodoDBResponse>(query)
            .bind(filter.user_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(todos)
    }

    #[instrument(skip(self), fields(todo_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM due_date_todos WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(todo_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // Full replace of all mutable fields
        let todo = sqlx::query_as::<_, DueDateTodoDBResponse>(
            r#"
            UPDATE due_date_todos SET
                title = $2,
                is_public = $3,
                is_finished = $4,
                description = $5,
                due_date = $6,
                importance = $7,
                category_id = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.title)
        .bind(request.is_public)
        .bind(request.is_finished)
        .bind(&request.description)
        .bind(request.due_date)
        .bind(request.importance)
        .bind(request.category_id)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(todo)
    }
}
