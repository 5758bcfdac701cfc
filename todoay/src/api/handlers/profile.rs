//! Public profile lookup by nickname. No authentication required.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    api::models::users::ProfileResponse,
    db::handlers::Users,
    errors::{Error, Result},
    types::Resource,
};

/// Look up a user's public profile by nickname
#[utoipa::path(
    get,
    path = "/profile/{nickname}",
    tag = "profile",
    params(("nickname" = String, Path, description = "The nickname to look up")),
    responses(
        (status = 200, description = "The public profile", body = ProfileResponse),
        (status = 404, description = "No user with that nickname"),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn read_profile(State(state): State<AppState>, Path(nickname): Path<String>) -> Result<Json<ProfileResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let user = Users::new(&mut conn)
        .get_user_by_nickname(&nickname)
        .await?
        .ok_or(Error::NotFound {
            resource: Resource::User,
            id: nickname,
        })?;

    Ok(Json(ProfileResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_config, create_test_user};
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use sqlx::PgPool;

    fn profile_router(pool: PgPool) -> TestServer {
        let state = AppState::builder().db(pool).config(create_test_config()).build();
        let app = Router::new().route("/profile/{nickname}", get(read_profile)).with_state(state);
        TestServer::new(app).unwrap()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_profile_is_public_and_minimal(pool: PgPool) {
        let user = create_test_user(&pool).await;
        let server = profile_router(pool);

        // No authorization header at all
        let response = server.get(&format!("/profile/{}", user.nickname)).await;
        response.assert_status_ok();

        let profile: ProfileResponse = response.json();
        assert_eq!(profile.nickname, user.nickname);

        // The raw body must not leak the email or any credential material
        let body = response.text();
        assert!(!body.contains(&user.email));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_unknown_nickname_is_not_found(pool: PgPool) {
        let server = profile_router(pool);

        let response = server.get("/profile/nobody-here").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
