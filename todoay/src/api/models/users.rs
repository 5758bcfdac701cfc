//! API request/response models for users and authentication.

use crate::db::models::users::UserDBResponse;
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Signup request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub nickname: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The token pair issued on successful login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Response for a newly created user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
}

/// Public profile fields visible without authentication
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub nickname: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserDBResponse> for ProfileResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            nickname: db.nickname,
            created_at: db.created_at,
        }
    }
}

/// The authenticated caller, resolved from the access token on every request.
///
/// This is the only source of caller identity: request bodies never carry an
/// owner id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub email: String,
    pub nickname: String,
}
