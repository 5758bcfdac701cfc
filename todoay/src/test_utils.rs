//! Test utilities for integration testing (available with `test-utils` feature).

use crate::auth::{
    password::{self, Argon2Params},
    token,
};
use crate::config::{AuthConfig, Config, CorsConfig, DatabaseConfig, PasswordConfig, PoolSettings};
use crate::db::{
    handlers::{Categories, Repository, Users},
    models::{
        categories::{CategoryCreateDBRequest, CategoryDBResponse},
        users::{UserCreateDBRequest, UserDBResponse},
    },
};
use crate::types::UserId;
use sqlx::PgPool;
use uuid::Uuid;

/// A fixed config for tests: signing works, validation rules are the
/// defaults, and the argon2 cost is dialed down so hashing does not dominate
/// test runtime.
pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: None,
        database: DatabaseConfig {
            // Overridden by the pool #[sqlx::test] injects
            url: "postgresql://localhost/todoay-test".to_string(),
            pool: PoolSettings {
                max_connections: 1,
                min_connections: 1,
                ..Default::default()
            },
        },
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        auth: AuthConfig {
            password: PasswordConfig {
                argon2_memory_kib: 1024,
                argon2_iterations: 1,
                argon2_parallelism: 1,
                ..Default::default()
            },
            cors: CorsConfig::default(),
            ..Default::default()
        },
    }
}

/// Cheap argon2 parameters for tests.
fn test_argon2_params() -> Argon2Params {
    Argon2Params::from(&create_test_config().auth.password)
}

/// Create a user with a random email/nickname and an unspecified password.
pub async fn create_test_user(pool: &PgPool) -> UserDBResponse {
    create_test_user_with_password(pool, "test-password-123").await
}

/// Create a user with a random email/nickname and the given password.
pub async fn create_test_user_with_password(pool: &PgPool, password: &str) -> UserDBResponse {
    let suffix = Uuid::new_v4().simple().to_string();
    let password_hash =
        password::hash_string_with_params(password, Some(test_argon2_params())).expect("Failed to hash test password");

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut users = Users::new(&mut conn);
    users
        .create(&UserCreateDBRequest {
            email: format!("user-{suffix}@example.com"),
            nickname: format!("user-{suffix}"),
            password_hash,
        })
        .await
        .expect("Failed to create test user")
}

/// Create a category owned by the given user.
pub async fn create_test_category(pool: &PgPool, user_id: UserId, name: &str) -> CategoryDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut categories = Categories::new(&mut conn);
    categories
        .create(&CategoryCreateDBRequest {
            user_id,
            name: name.to_string(),
            color: None,
        })
        .await
        .expect("Failed to create test category")
}

/// Build a ready-to-send `Authorization` header value holding a fresh access
/// token for the given user, signed with the test config's secret.
pub fn bearer_for(user: &UserDBResponse) -> String {
    let config = create_test_config();
    let access_token = token::issue_access_token(&user.email, &config).expect("Failed to issue test access token");
    format!("Bearer {access_token}")
}
