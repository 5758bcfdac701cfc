//! Database models for categories.

use crate::auth::ownership::Owned;
use crate::types::{CategoryId, Resource, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database request for creating a category
#[derive(Debug, Clone)]
pub struct CategoryCreateDBRequest {
    pub user_id: UserId,
    pub name: String,
    pub color: Option<String>,
}

/// Database request for updating a category (full replace)
#[derive(Debug, Clone)]
pub struct CategoryUpdateDBRequest {
    pub name: String,
    pub color: Option<String>,
}

/// Database response for a category
#[derive(Debug, Clone, FromRow)]
pub struct CategoryDBResponse {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Owned for CategoryDBResponse {
    const RESOURCE: Resource = Resource::Category;

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.user_id
    }
}
