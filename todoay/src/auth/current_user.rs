//! Request identity resolution.
//!
//! [`CurrentUser`] implements [`FromRequestParts`], so any handler that
//! declares it as a parameter is authenticated: the extractor reads the
//! `Authorization: Bearer` header, verifies the access token, and resolves
//! the token subject against the users table. Public routes simply do not
//! declare the parameter.

use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::token::{self, TokenKind},
    db::{errors::DbError, handlers::Users},
    errors::{Error, Result},
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, instrument, trace};

/// Extract a user from a Bearer access token if one is present.
/// Returns:
/// - None: No Authorization header or not a Bearer token
/// - Some(Ok(user)): Valid access token for an existing user
/// - Some(Err(error)): Bearer token present but invalid, expired, or orphaned
#[instrument(skip(parts, state))]
async fn try_bearer_token_auth(parts: &Parts, state: &AppState) -> Option<Result<CurrentUser>> {
    let auth_header = parts.headers.get(axum::http::header::AUTHORIZATION)?;

    let auth_str = match auth_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::BadRequest {
                message: format!("Invalid authorization header: {e}"),
            }));
        }
    };

    // Check for Bearer token format
    let bearer_token = auth_str.strip_prefix("Bearer ")?;

    // Only access tokens authenticate requests; a refresh token here is rejected
    let subject = match token::verify_token(bearer_token, TokenKind::Access, &state.config) {
        Ok(subject) => subject,
        Err(e) => return Some(Err(e.into())),
    };

    let mut conn = match state.db.acquire().await {
        Ok(conn) => conn,
        Err(e) => return Some(Err(DbError::from(e).into())),
    };
    let mut users_repo = Users::new(&mut conn);

    match users_repo.get_user_by_email(&subject).await {
        // Token subject no longer maps to an account (e.g. deleted since issue)
        Ok(None) => {
            trace!("Valid token for nonexistent user");
            Some(Err(Error::Unauthenticated { message: None }))
        }
        Ok(Some(user)) => Some(Ok(CurrentUser {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
        })),
        Err(e) => Some(Err(Error::Database(e))),
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        match try_bearer_token_auth(parts, state).await {
            Some(Ok(user)) => {
                debug!("Authenticated user: {}", user.id);
                Ok(user)
            }
            Some(Err(e)) => {
                trace!("Bearer token authentication failed: {:?}", e);
                Err(e)
            }
            None => {
                trace!("No authentication credentials found in request");
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}
