//! Daily todo handlers.
//!
//! Every write runs inside one transaction covering the category ownership
//! check, the todo row, and the hashtag links, so a failure anywhere leaves
//! no partial state behind.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sqlx::PgConnection;

use crate::{
    AppState,
    api::models::{
        categories::CategoryResponse,
        todos::{DailyTodoCreateRequest, DailyTodoListQuery, DailyTodoModifyRequest, DailyTodoResponse, TodoCreatedResponse},
        users::CurrentUser,
    },
    auth::ownership::assert_owner,
    db::{
        handlers::{Categories, DailyTodos, Hashtags, Repository, daily_todos::DailyTodoFilter},
        models::todos::{DailyTodoCreateDBRequest, DailyTodoDBResponse, DailyTodoUpdateDBRequest},
    },
    errors::{Error, Result},
    types::{CategoryId, Resource, TodoId},
};

/// Fetch a daily todo or 404, then verify the caller owns it.
async fn fetch_owned_todo(conn: &mut PgConnection, user: &CurrentUser, id: TodoId) -> Result<DailyTodoDBResponse> {
    let todo = DailyTodos::new(conn).get_by_id(id).await?.ok_or(Error::NotFound {
        resource: Resource::DailyTodo,
        id: id.to_string(),
    })?;
    assert_owner(user, &todo)?;
    Ok(todo)
}

/// Resolve an optional category reference: it must exist and belong to the
/// caller before a todo may point at it.
async fn resolve_category(conn: &mut PgConnection, user: &CurrentUser, category_id: Option<CategoryId>) -> Result<Option<CategoryId>> {
    match category_id {
        None => Ok(None),
        Some(id) => {
            let category = Categories::new(conn).get_by_id(id).await?.ok_or(Error::NotFound {
                resource: Resource::Category,
                id: id.to_string(),
            })?;
            assert_owner(user, &category)?;
            Ok(Some(id))
        }
    }
}

async fn build_response(conn: &mut PgConnection, todo: DailyTodoDBResponse) -> Result<DailyTodoResponse> {
    let category = match todo.category_id {
        Some(id) => Categories::new(&mut *conn).get_by_id(id).await?.map(CategoryResponse::from),
        None => None,
    };
    let hashtags = Hashtags::new(&mut *conn).list_for_daily(todo.id).await?;
    Ok(DailyTodoResponse::from_parts(todo, category, hashtags))
}

/// Create a daily todo owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/daily-todos",
    request_body = DailyTodoCreateRequest,
    tag = "daily-todos",
    responses(
        (status = 201, description = "Todo created", body = TodoCreatedResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Referenced category not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_daily_todo(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<DailyTodoCreateRequest>,
) -> Result<(StatusCode, Json<TodoCreatedResponse>)> {
    if request.title.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Title cannot be empty".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let category_id = resolve_category(&mut tx, &user, request.category_id).await?;

    let todo = DailyTodos::new(&mut tx)
        .create(&DailyTodoCreateDBRequest {
            user_id: user.id,
            title: request.title,
            is_public: request.is_public,
            description: request.description,
            daily_date: request.daily_date,
            target_time: request.target_time,
            alarm: request.alarm,
            place: request.place,
            people: request.people,
            category_id,
        })
        .await?;

    Hashtags::new(&mut tx).attach_to_daily(todo.id, &request.hashtags).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(TodoCreatedResponse { id: todo.id })))
}

/// Read one daily todo with its category and hashtags
#[utoipa::path(
    get,
    path = "/api/v1/daily-todos/{id}",
    tag = "daily-todos",
    params(("id" = String, Path, format = "uuid", description = "Todo id")),
    responses(
        (status = 200, description = "The todo", body = DailyTodoResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Todo not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn read_daily_todo(State(state): State<AppState>, user: CurrentUser, Path(id): Path<TodoId>) -> Result<Json<DailyTodoResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let todo = fetch_owned_todo(&mut conn, &user, id).await?;
    let response = build_response(&mut conn, todo).await?;

    Ok(Json(response))
}

/// List the caller's daily todos for one calendar day
#[utoipa::path(
    get,
    path = "/api/v1/daily-todos",
    tag = "daily-todos",
    params(DailyTodoListQuery),
    responses(
        (status = 200, description = "Todos for the requested day", body = Vec<DailyTodoResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id, date = %query.date))]
pub async fn list_daily_todos(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<DailyTodoListQuery>,
) -> Result<Json<Vec<DailyTodoResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let todos = DailyTodos::new(&mut conn).list(&DailyTodoFilter::new(user.id, query.date)).await?;

    let mut responses = Vec::with_capacity(todos.len());
    for todo in todos {
        responses.push(build_response(&mut conn, todo).await?);
    }

    Ok(Json(responses))
}

/// Replace a daily todo
#[utoipa::path(
    put,
    path = "/api/v1/daily-todos/{id}",
    request_body = DailyTodoModifyRequest,
    tag = "daily-todos",
    params(("id" = String, Path, format = "uuid", description = "Todo id")),
    responses(
        (status = 204, description = "Todo updated"),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Todo or referenced category not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn modify_daily_todo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<TodoId>,
    Json(request): Json<DailyTodoModifyRequest>,
) -> Result<StatusCode> {
    if request.title.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Title cannot be empty".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    fetch_owned_todo(&mut tx, &user, id).await?;
    // The category is re-resolved on every modify; None clears the association
    let category_id = resolve_category(&mut tx, &user, request.category_id).await?;

    DailyTodos::new(&mut tx)
        .update(
            id,
            &DailyTodoUpdateDBRequest {
                title: request.title,
                is_public: request.is_public,
                is_finished: request.is_finished,
                description: request.description,
                daily_date: request.daily_date,
                target_time: request.target_time,
                alarm: request.alarm,
                place: request.place,
                people: request.people,
                category_id,
            },
        )
        .await?;

    Hashtags::new(&mut tx).attach_to_daily(id, &request.hashtags).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a daily todo
#[utoipa::path(
    delete,
    path = "/api/v1/daily-todos/{id}",
    tag = "daily-todos",
    params(("id" = String, Path, format = "uuid", description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Todo not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn delete_daily_todo(State(state): State<AppState>, user: CurrentUser, Path(id): Path<TodoId>) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    fetch_owned_todo(&mut tx, &user, id).await?;
    DailyTodos::new(&mut tx).delete(id).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{bearer_for, create_test_category, create_test_config, create_test_user};
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use serde_json::json;
    use sqlx::PgPool;

    fn todo_router(pool: PgPool) -> TestServer {
        let state = AppState::builder().db(pool).config(create_test_config()).build();
        let app = Router::new()
            .route("/api/v1/daily-todos", get(list_daily_todos).post(create_daily_todo))
            .route(
                "/api/v1/daily-todos/{id}",
                get(read_daily_todo).put(modify_daily_todo).delete(delete_daily_todo),
            )
            .with_state(state);
        TestServer::new(app).unwrap()
    }

    fn minimal_body(title: &str) -> serde_json::Value {
        json!({
            "title": title,
            "daily_date": "2025-06-01"
        })
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_read_back(pool: PgPool) {
        let user = create_test_user(&pool).await;
        let auth = bearer_for(&user);
        let server = todo_router(pool);

        let response = server
            .post("/api/v1/daily-todos")
            .add_header("authorization", &auth)
            .json(&json!({
                "title": "Morning run",
                "daily_date": "2025-06-01",
                "place": "Park",
                "hashtags": ["#Fitness", "morning"]
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: TodoCreatedResponse = response.json();

        let response = server
            .get(&format!("/api/v1/daily-todos/{}", created.id))
            .add_header("authorization", &auth)
            .await;
        response.assert_status_ok();
        let todo: DailyTodoResponse = response.json();
        assert_eq!(todo.title, "Morning run");
        assert!(!todo.is_finished);
        assert_eq!(todo.place.as_deref(), Some("Park"));
        assert_eq!(todo.hashtags, vec!["fitness".to_string(), "morning".to_string()]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_with_foreign_category_persists_nothing(pool: PgPool) {
        let owner = create_test_user(&pool).await;
        let stranger = create_test_user(&pool).await;
        let category = create_test_category(&pool, owner.id, "Not yours").await;
        let server = todo_router(pool.clone());

        let response = server
            .post("/api/v1/daily-todos")
            .add_header("authorization", &bearer_for(&stranger))
            .json(&json!({
                "title": "Sneaky",
                "daily_date": "2025-06-01",
                "category_id": category.id,
                "hashtags": ["tag"]
            }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        // The rejected create left no todo behind
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM daily_todos")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_by_date(pool: PgPool) {
        let user = create_test_user(&pool).await;
        let auth = bearer_for(&user);
        let server = todo_router(pool);

        for (title, date) in [("first", "2025-06-01"), ("second", "2025-06-01"), ("other day", "2025-06-02")] {
            server
                .post("/api/v1/daily-todos")
                .add_header("authorization", &auth)
                .json(&json!({"title": title, "daily_date": date}))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get("/api/v1/daily-todos")
            .add_query_param("date", "2025-06-01")
            .add_header("authorization", &auth)
            .await;
        response.assert_status_ok();
        let todos: Vec<DailyTodoResponse> = response.json();
        let titles: Vec<_> = todos.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_stranger_modify_leaves_todo_unchanged(pool: PgPool) {
        let owner = create_test_user(&pool).await;
        let stranger = create_test_user(&pool).await;
        let server = todo_router(pool.clone());

        let response = server
            .post("/api/v1/daily-todos")
            .add_header("authorization", &bearer_for(&owner))
            .json(&minimal_body("Original"))
            .await;
        let created: TodoCreatedResponse = response.json();

        let response = server
            .put(&format!("/api/v1/daily-todos/{}", created.id))
            .add_header("authorization", &bearer_for(&stranger))
            .json(&minimal_body("Hijacked"))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let title = sqlx::query_scalar::<_, String>("SELECT title FROM daily_todos WHERE id = $1")
            .bind(created.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(title, "Original");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_stranger_cannot_read_or_delete(pool: PgPool) {
        let owner = create_test_user(&pool).await;
        let stranger = create_test_user(&pool).await;
        let server = todo_router(pool.clone());

        let response = server
            .post("/api/v1/daily-todos")
            .add_header("authorization", &bearer_for(&owner))
            .json(&minimal_body("Private"))
            .await;
        let created: TodoCreatedResponse = response.json();

        let read = server
            .get(&format!("/api/v1/daily-todos/{}", created.id))
            .add_header("authorization", &bearer_for(&stranger))
            .await;
        read.assert_status(StatusCode::NOT_FOUND);

        let delete = server
            .delete(&format!("/api/v1/daily-todos/{}", created.id))
            .add_header("authorization", &bearer_for(&stranger))
            .await;
        delete.assert_status(StatusCode::NOT_FOUND);

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM daily_todos WHERE id = $1")
            .bind(created.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_modify_clears_category_and_replaces_hashtags(pool: PgPool) {
        let user = create_test_user(&pool).await;
        let category = create_test_category(&pool, user.id, "Chores").await;
        let auth = bearer_for(&user);
        let server = todo_router(pool);

        let response = server
            .post("/api/v1/daily-todos")
            .add_header("authorization", &auth)
            .json(&json!({
                "title": "Laundry",
                "daily_date": "2025-06-01",
                "category_id": category.id,
                "hashtags": ["home"]
            }))
            .await;
        let created: TodoCreatedResponse = response.json();

        // Full replace without category_id clears it; new hashtag list replaces the old
        let response = server
            .put(&format!("/api/v1/daily-todos/{}", created.id))
            .add_header("authorization", &auth)
            .json(&json!({
                "title": "Laundry",
                "is_finished": true,
                "daily_date": "2025-06-01",
                "hashtags": ["weekend"]
            }))
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = server
            .get(&format!("/api/v1/daily-todos/{}", created.id))
            .add_header("authorization", &auth)
            .await;
        let todo: DailyTodoResponse = response.json();
        assert!(todo.is_finished);
        assert!(todo.category.is_none());
        assert_eq!(todo.hashtags, vec!["weekend".to_string()]);
    }
}
