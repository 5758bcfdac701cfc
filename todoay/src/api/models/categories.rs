//! API request/response models for categories.

use crate::db::models::categories::CategoryDBResponse;
use crate::types::CategoryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Create or replace a category
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CategorySaveRequest {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CategoryId,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CategoryDBResponse> for CategoryResponse {
    fn from(db: CategoryDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            color: db.color,
            created_at: db.created_at,
        }
    }
}

/// Response for a newly created category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryCreatedResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CategoryId,
}
