//! Repository implementations for database access.
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed CRUD operations
//! - Handles query construction and parameter binding
//! - Returns domain models from [`crate::db::models`]
//! - Uses the connection's transaction for ACID guarantees
//!
//! # Common Pattern
//!
//! ```ignore
//! use todoay::db::handlers::{Categories, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     // Start a transaction
//!     let mut tx = pool.begin().await?;
//!
//!     // Create repository from transaction
//!     let mut repo = Categories::new(&mut tx);
//!
//!     // Perform operations, then commit or rollback
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod categories;
pub mod daily_todos;
pub mod due_date_todos;
pub mod hashtags;
pub mod repository;
pub mod users;

pub use categories::Categories;
pub use daily_todos::DailyTodos;
pub use due_date_todos::DueDateTodos;
pub use hashtags::Hashtags;
pub use repository::Repository;
pub use users::Users;
