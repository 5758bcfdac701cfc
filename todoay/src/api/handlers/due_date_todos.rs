//! Due-date todo handlers.
//!
//! Same transactional shape as the daily variant; the differences are the
//! importance level (validated free text on the way in) and the sortable
//! listing instead of a per-day one.

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
        todos::{DueDateTodoCreateRequest, DueDateTodoListQuery, DueDateTodoModifyRequest, DueDateTodoResponse, TodoCreatedResponse},
        users::CurrentUser,
    },
    auth::ownership::assert_owner,
    db::{
        handlers::{Categories, DueDateTodos, Hashtags, Repository, due_date_todos::DueDateTodoFilter},
        models::todos::{DueDateTodoCreateDBRequest, DueDateTodoDBResponse, DueDateTodoUpdateDBRequest},
    },
    errors::{Error, Result},
    types::{CategoryId, Importance, Resource, TodoId},
};

/// Fetch a due-date todo or 404, then verify the caller owns it.
async fn fetch_owned_todo(conn: &mut PgConnection, user: &CurrentUser, id: TodoId) -> Result<DueDateTodoDBResponse> {
    let todo = DueDateTodos::new(conn).get_by_id(id).await?.ok_or(Error::NotFound {
        resource: Resource::DueDateTodo,
        id: id.to_string(),
    })?;
    assert_owner(user, &todo)?;
    Ok(todo)
}

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

async fn build_response(conn: &mut PgConnection, todo: DueDateTodoDBResponse) -> Result<DueDateTodoResponse> {
    let category = match todo.category_id {
        Some(id) => Categories::new(&mut *conn).get_by_id(id).await?.map(CategoryResponse::from),
        None => None,
    };
    let hashtags = Hashtags::new(&mut *conn).list_for_due_date(todo.id).await?;
    Ok(DueDateTodoResponse::from_parts(todo, category, hashtags))
}

/// Create a due-date todo owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/due-date-todos",
    request_body = DueDateTodoCreateRequest,
    tag = "due-date-todos",
    responses(
        (status = 201, description = "Todo created", body = TodoCreatedResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Referenced category not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_due_date_todo(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<DueDateTodoCreateRequest>,
) -> Result<(StatusCode, Json<TodoCreatedResponse>)> {
    if request.title.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Title cannot be empty".to_string(),
        });
    }
    let importance = Importance::parse(&request.importance)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let category_id = resolve_category(&mut tx, &user, request.category_id).await?;

    let todo = DueDateTodos::new(&mut tx)
        .create(&DueDateTodoCreateDBRequest {
            user_id: user.id,
            title: request.title,
            is_public: request.is_public,
            description: request.description,
            due_date: request.due_date,
            importance,
            category_id,
        })
        .await?;

    Hashtags::new(&mut tx).attach_to_due_date(todo.id, &request.hashtags).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(TodoCreatedResponse { id: todo.id })))
}

/// Read one due-date todo with its category and hashtags
#[utoipa::path(
    get,
    path = "/api/v1/due-date-todos/{id}",
    tag = "due-date-todos",
    params(("id" = String, Path, format = "uuid", description = "Todo id")),
    responses(
        (status = 200, description = "The todo", body = DueDateTodoResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Todo not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn read_due_date_todo(State(state): State<AppState>, user: CurrentUser, Path(id): Path<TodoId>) -> Result<Json<DueDateTodoResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let todo = fetch_owned_todo(&mut conn, &user, id).await?;
    let response = build_response(&mut conn, todo).await?;

    Ok(Json(response))
}

/// List the caller's due-date todos, sorted by due date or importance
#[utoipa::path(
    get,
    path = "/api/v1/due-date-todos",
    tag = "due-date-todos",
    params(DueDateTodoListQuery),
    responses(
        (status = 200, description = "The caller's due-date todos", body = Vec<DueDateTodoResponse>),
        (status = 400, description = "Unknown sort order"),
        (status = 401, description = "Not authenticated"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id, sort = ?query.sort))]
pub async fn list_due_date_todos(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<DueDateTodoListQuery>,
) -> Result<Json<Vec<DueDateTodoResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let todos = DueDateTodos::new(&mut conn).list(&DueDateTodoFilter::new(user.id, query.sort)).await?;

    let mut responses = Vec::with_capacity(todos.len());
    for todo in todos {
        responses.push(build_response(&mut conn, todo).await?);
    }

    Ok(Json(responses))
}

/// Replace a due-date todo
#[utoipa::path(
    put,
    path = "/api/v1/due-date-todos/{id}",
    request_body = DueDateTodoModifyRequest,
    tag = "due-date-todos",
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
pub async fn modify_due_date_todo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<TodoId>,
    Json(request): Json<DueDateTodoModifyRequest>,
) -> Result<StatusCode> {
    if request.title.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Title cannot be empty".to_string(),
        });
    }
    let importance = Importance::parse(&request.importance)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    fetch_owned_todo(&mut tx, &user, id).await?;
    let category_id = resolve_category(&mut tx, &user, request.category_id).await?;

    DueDateTodos::new(&mut tx)
        .update(
            id,
            &DueDateTodoUpdateDBRequest {
                title: request.title,
                is_public: request.is_public,
                is_finished: request.is_finished,
                description: request.description,
                due_date: request.due_date,
                importance,
                category_id,
            },
        )
        .await?;

    Hashtags::new(&mut tx).attach_to_due_date(id, &request.hashtags).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a due-date todo
#[utoipa::path(
    delete,
    path = "/api/v1/due-date-todos/{id}",
    tag = "due-date-todos",
    params(("id" = String, Path, format = "uuid", description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Todo not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn delete_due_date_todo(State(state): State<AppState>, user: CurrentUser, Path(id): Path<TodoId>) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    fetch_owned_todo(&mut tx, &user, id).await?;
    DueDateTodos::new(&mut tx).delete(id).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{bearer_for, create_test_config, create_test_user};
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use serde_json::json;
    use sqlx::PgPool;

    fn todo_router(pool: PgPool) -> TestServer {
        let state = AppState::builder().db(pool).config(create_test_config()).build();
        let app = Router::new()
            .route("/api/v1/due-date-todos", get(list_due_date_todos).post(create_due_date_todo))
            .route(
                "/api/v1/due-date-todos/{id}",
                get(read_due_date_todo).put(modify_due_date_todo).delete(delete_due_date_todo),
            )
            .with_state(state);
        TestServer::new(app).unwrap()
    }

    async fn create_todo(server: &TestServer, auth: &str, title: &str, due_date: &str, importance: &str) -> TodoCreatedResponse {
        let response = server
            .post("/api/v1/due-date-todos")
            .add_header("authorization", auth)
            .json(&json!({
                "title": title,
                "due_date": due_date,
                "importance": importance
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_read_back(pool: PgPool) {
        let user = create_test_user(&pool).await;
        let auth = bearer_for(&user);
        let server = todo_router(pool);

        let created = create_todo(&server, &auth, "File taxes", "2025-04-15", "HIGH").await;

        let response = server
            .get(&format!("/api/v1/due-date-todos/{}", created.id))
            .add_header("authorization", &auth)
            .await;
        response.assert_status_ok();
        let todo: DueDateTodoResponse = response.json();
        assert_eq!(todo.title, "File taxes");
        assert_eq!(todo.importance, Importance::High);
        assert!(!todo.is_finished);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_importance_is_case_insensitive_but_validated(pool: PgPool) {
        let user = create_test_user(&pool).await;
        let auth = bearer_for(&user);
        let server = todo_router(pool);

        create_todo(&server, &auth, "Lower case works", "2025-05-01", "medium").await;

        let response = server
            .post("/api/v1/due-date-todos")
            .add_header("authorization", &auth)
            .json(&json!({
                "title": "Bad importance",
                "due_date": "2025-05-01",
                "importance": "URGENT"
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_sorted_by_due_date(pool: PgPool) {
        let user = create_test_user(&pool).await;
        let auth = bearer_for(&user);
        let server = todo_router(pool);

        create_todo(&server, &auth, "later", "2025-07-01", "LOW").await;
        create_todo(&server, &auth, "sooner", "2025-06-01", "LOW").await;
        create_todo(&server, &auth, "middle", "2025-06-15", "HIGH").await;

        let response = server.get("/api/v1/due-date-todos").add_header("authorization", &auth).await;
        response.assert_status_ok();
        let todos: Vec<DueDateTodoResponse> = response.json();
        let titles: Vec<_> = todos.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["sooner", "middle", "later"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_sorted_by_importance(pool: PgPool) {
        let user = create_test_user(&pool).await;
        let auth = bearer_for(&user);
        let server = todo_router(pool);

        create_todo(&server, &auth, "high", "2025-06-01", "HIGH").await;
        create_todo(&server, &auth, "low", "2025-06-01", "LOW").await;
        create_todo(&server, &auth, "medium", "2025-06-01", "MEDIUM").await;

        let response = server
            .get("/api/v1/due-date-todos")
            .add_query_param("sort", "importance")
            .add_header("authorization", &auth)
            .await;
        response.assert_status_ok();
        let todos: Vec<DueDateTodoResponse> = response.json();
        let titles: Vec<_> = todos.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["low", "medium", "high"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_stranger_modify_is_not_found(pool: PgPool) {
        let owner = create_test_user(&pool).await;
        let stranger = create_test_user(&pool).await;
        let server = todo_router(pool.clone());

        let created = create_todo(&server, &bearer_for(&owner), "Mine", "2025-06-01", "LOW").await;

        let response = server
            .put(&format!("/api/v1/due-date-todos/{}", created.id))
            .add_header("authorization", &bearer_for(&stranger))
            .json(&json!({
                "title": "Not yours anymore",
                "due_date": "2025-06-01",
                "importance": "LOW"
            }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let title = sqlx::query_scalar::<_, String>("SELECT title FROM due_date_todos WHERE id = $1")
            .bind(created.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(title, "Mine");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_owner_delete(pool: PgPool) {
        let user = create_test_user(&pool).await;
        let auth = bearer_for(&user);
        let server = todo_router(pool.clone());

        let created = create_todo(&server, &auth, "Done soon", "2025-06-01", "MEDIUM").await;

        let response = server
            .delete(&format!("/api/v1/due-date-todos/{}", created.id))
            .add_header("authorization", &auth)
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM due_date_todos")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
