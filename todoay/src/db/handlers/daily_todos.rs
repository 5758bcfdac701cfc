//! Database repository for daily todos.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::todos::{DailyTodoCreateDBRequest, DailyTodoDBResponse, DailyTodoUpdateDBRequest},
};
use crate::types::{TodoId, UserId, abbrev_uuid};
use chrono::NaiveDate;
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing daily todos: the owner's todos for one calendar day.
#[derive(Debug, Clone)]
pub struct DailyTodoFilter {
    pub user_id: UserId,
    pub date: NaiveDate,
}

impl DailyTodoFilter {
    pub fn new(user_id: UserId, date: NaiveDate) -> Self {
        Self { user_id, date }
    }
}

pub struct DailyTodos<'c> {
    db: &'c mut PgConnection,
}

impl<'c> DailyTodos<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for DailyTodos<'c> {
    type CreateRequest = DailyTodoCreateDBRequest;
    type UpdateRequest = DailyTodoUpdateDBRequest;
    type Response = DailyTodoDBResponse;
    type Id = TodoId;
    type Filter = DailyTodoFilter;

    #[instrument(skip(self, request), fields(user_id = %abbrev_uuid(&request.user_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let todo_id = Uuid::new_v4();

        // New todos always start unfinished
        let todo = sqlx::query_as::<_, DailyTodoDBResponse>(
            r#"
            INSERT INTO daily_todos
                (id, user_id, title, is_public, is_finished, description, daily_date,
                 target_time, alarm, place, people, category_id)
            VALUES ($1, $2, $3, $4, FALSE, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(todo_id)
        .bind(request.user_id)
        .bind(&request.title)
        .bind(request.is_public)
        .bind(&request.description)
        .bind(request.daily_date)
        .bind(request.target_time)
        .bind(request.alarm)
        .bind(&request.place)
        .bind(&request.people)
        .bind(request.category_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(todo)
    }

    #[instrument(skip(self), fields(todo_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let todo = sqlx::query_as::<_, DailyTodoDBResponse>("SELECT * FROM daily_todos WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(todo)
    }

    #[instrument(skip(self, filter), fields(user_id = %abbrev_uuid(&filter.user_id), date = %filter.date), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let todos = sqlx::query_as::<_, DailyTodoDBResponse>(
            r#"
            SELECT * FROM daily_todos
            WHERE user_id = $1 AND daily_date = $2
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.date)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(todos)
    }

    #[instrument(skip(self), fields(todo_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM daily_todos WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(todo_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // Full replace of all mutable fields
        let todo = sqlx::query_as::<_, DailyTodoDBResponse>(
            r#"
            UPDATE daily_todos SET
                title = $2,
                is_public = $3,
                is_finished = $4,
                description = $5,
                daily_date = $6,
                target_time = $7,
                alarm = $8,
                place = $9,
                people = $10,
                category_id = $11,
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
        .bind(request.daily_date)
        .bind(request.target_time)
        .bind(request.alarm)
        .bind(&request.place)
        .bind(&request.people)
        .bind(request.category_id)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(todo)
    }
}
