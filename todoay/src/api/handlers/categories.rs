//! Owner-scoped category CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::models::{
        categories::{CategoryCreatedResponse, CategoryResponse, CategorySaveRequest},
        users::CurrentUser,
    },
    auth::ownership::assert_owner,
    db::{
        handlers::{Categories, Repository, categories::CategoryFilter},
        models::categories::{CategoryCreateDBRequest, CategoryDBResponse, CategoryUpdateDBRequest},
    },
    errors::{Error, Result},
    types::{CategoryId, Resource},
};

/// Fetch a category or 404, then verify the caller owns it.
async fn fetch_owned_category(repo: &mut Categories<'_>, user: &CurrentUser, id: CategoryId) -> Result<CategoryDBResponse> {
    let category = repo.get_by_id(id).await?.ok_or(Error::NotFound {
        resource: Resource::Category,
        id: id.to_string(),
    })?;
    assert_owner(user, &category)?;
    Ok(category)
}

/// List the caller's categories
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    responses(
        (status = 200, description = "The caller's categories", body = Vec<CategoryResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_categories(State(state): State<AppState>, user: CurrentUser) -> Result<Json<Vec<CategoryResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Categories::new(&mut conn);

    let categories = repo.list(&CategoryFilter::new(user.id)).await?;

    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

/// Create a category owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategorySaveRequest,
    tag = "categories",
    responses(
        (status = 201, description = "Category created", body = CategoryCreatedResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_category(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CategorySaveRequest>,
) -> Result<(StatusCode, Json<CategoryCreatedResponse>)> {
    if request.name.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Category name cannot be empty".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Categories::new(&mut conn);

    let created = repo
        .create(&CategoryCreateDBRequest {
            user_id: user.id,
            name: request.name,
            color: request.color,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryCreatedResponse { id: created.id })))
}

/// Replace a category's name and color
#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    request_body = CategorySaveRequest,
    tag = "categories",
    params(("id" = String, Path, format = "uuid", description = "Category id")),
    responses(
        (status = 204, description = "Category updated"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Category not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn modify_category(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<CategoryId>,
    Json(request): Json<CategorySaveRequest>,
) -> Result<StatusCode> {
    if request.name.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Category name cannot be empty".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Categories::new(&mut tx);

    fetch_owned_category(&mut repo, &user, id).await?;
    repo.update(
        id,
        &CategoryUpdateDBRequest {
            name: request.name,
            color: request.color,
        },
    )
    .await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a category; todos referencing it keep existing without one
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    params(("id" = String, Path, format = "uuid", description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Category not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn delete_category(State(state): State<AppState>, user: CurrentUser, Path(id): Path<CategoryId>) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Categories::new(&mut tx);

    fetch_owned_category(&mut repo, &user, id).await?;
    repo.delete(id).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{bearer_for, create_test_category, create_test_config, create_test_user};
    use axum::{
        Router,
        routing::{get, put},
    };
    use axum_test::TestServer;
    use serde_json::json;
    use sqlx::PgPool;

    fn category_router(pool: PgPool) -> TestServer {
        let state = AppState::builder().db(pool).config(create_test_config()).build();
        let app = Router::new()
            .route("/api/v1/categories", get(list_categories).post(create_category))
            .route("/api/v1/categories/{id}", put(modify_category).delete(delete_category))
            .with_state(state);
        TestServer::new(app).unwrap()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_list_own_categories(pool: PgPool) {
        let user = create_test_user(&pool).await;
        let auth = bearer_for(&user);
        let server = category_router(pool);

        let response = server
            .post("/api/v1/categories")
            .add_header("authorization", &auth)
            .json(&json!({"name": "Work", "color": "#00ff00"}))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server.get("/api/v1/categories").add_header("authorization", &auth).await;
        response.assert_status_ok();
        let categories: Vec<CategoryResponse> = response.json();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Work");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_requires_authentication(pool: PgPool) {
        let server = category_router(pool);

        let response = server.get("/api/v1/categories").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_stranger_cannot_modify_category(pool: PgPool) {
        let owner = create_test_user(&pool).await;
        let stranger = create_test_user(&pool).await;
        let category = create_test_category(&pool, owner.id, "Private").await;
        let server = category_router(pool.clone());

        let response = server
            .put(&format!("/api/v1/categories/{}", category.id))
            .add_header("authorization", &bearer_for(&stranger))
            .json(&json!({"name": "Hijacked", "color": null}))
            .await;
        // Renders as absent, not forbidden
        response.assert_status(StatusCode::NOT_FOUND);

        // And nothing changed
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM categories WHERE id = $1")
            .bind(category.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(name, "Private");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_stranger_cannot_delete_category(pool: PgPool) {
        let owner = create_test_user(&pool).await;
        let stranger = create_test_user(&pool).await;
        let category = create_test_category(&pool, owner.id, "Keep me").await;
        let server = category_router(pool.clone());

        let response = server
            .delete(&format!("/api/v1/categories/{}", category.id))
            .add_header("authorization", &bearer_for(&stranger))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE id = $1")
            .bind(category.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_owner_can_delete_category(pool: PgPool) {
        let owner = create_test_user(&pool).await;
        let category = create_test_category(&pool, owner.id, "Done with this").await;
        let server = category_router(pool);

        let response = server
            .delete(&format!("/api/v1/categories/{}", category.id))
            .add_header("authorization", &bearer_for(&owner))
            .await;
        response.assert_status(StatusCode::NO_CONTENT);
    }
}
