//! Axum request handlers, grouped by resource.

pub mod auth;
pub mod categories;
pub mod daily_todos;
pub mod due_date_todos;
pub mod profile;
