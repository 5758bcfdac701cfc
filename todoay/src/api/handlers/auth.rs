//! Signup and login handlers.

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    api::models::users::{LoginRequest, SignupRequest, SignupResponse, TokenPairResponse},
    auth::{
        password::{self, Argon2Params},
        token,
    },
    db::{handlers::Users, models::users::UserCreateDBRequest},
    errors::Error,
};

/// Register a new user account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    tag = "auth",
    responses(
        (status = 201, description = "User registered successfully", body = SignupResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email or nickname already taken"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn signup(State(state): State<AppState>, Json(request): Json<SignupRequest>) -> Result<(StatusCode, Json<SignupResponse>), Error> {
    // Validate password length
    let password_config = &state.config.auth.password;
    if request.password.len() < password_config.min_length {
        return Err(Error::BadRequest {
            message: format!("Password must be at least {} characters", password_config.min_length),
        });
    }
    if request.password.len() > password_config.max_length {
        return Err(Error::BadRequest {
            message: format!("Password must be no more than {} characters", password_config.max_length),
        });
    }

    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(Error::BadRequest {
            message: "A valid email address is required".to_string(),
        });
    }
    if request.nickname.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Nickname cannot be empty".to_string(),
        });
    }

    // Hash the password on a blocking thread to avoid blocking async runtime
    let params = Argon2Params::from(password_config);
    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string_with_params(&password, Some(params)))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut conn);

    // No pre-check: the unique constraints arbitrate duplicates, race-free.
    // A violation surfaces as 409 with a friendly message.
    let created_user = user_repo
        .create(&UserCreateDBRequest {
            email: request.email,
            nickname: request.nickname,
            password_hash,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(SignupResponse { id: created_user.id })))
}

/// Login with email and password, receiving an access/refresh token pair
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    tag = "auth",
    responses(
        (status = 200, description = "Login successful", body = TokenPairResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Json<TokenPairResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut conn);

    // Unknown email and wrong password are indistinguishable to the caller;
    // the real cause only appears in debug logs.
    let user = user_repo.get_user_by_email(&request.email).await?.ok_or_else(|| {
        tracing::debug!("Login failed: no account for submitted email");
        Error::Unauthenticated {
            message: Some("Invalid email or password".to_string()),
        }
    })?;

    // Verify password on a blocking thread to avoid blocking async runtime
    let password = request.password.clone();
    let hash = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        tracing::debug!("Login failed: password mismatch for {}", user.id);
        return Err(Error::Unauthenticated {
            message: Some("Invalid email or password".to_string()),
        });
    }

    let access_token = token::issue_access_token(&user.email, &state.config)?;
    let refresh_token = token::issue_refresh_token(&user.email, &state.config)?;

    Ok(Json(TokenPairResponse {
        access_token,
        refresh_token,
    }))
}
