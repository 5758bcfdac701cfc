//! JWT access/refresh token creation and verification.
//!
//! Tokens are stateless: the only claims are the subject (the user's email),
//! the token kind, and the issue/expiry timestamps. A login issues one token
//! of each kind; request authentication only ever accepts access tokens.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use crate::{config::Config, errors::Error};

/// Which of the two token flavors a JWT represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,     // Subject (user email)
    pub kind: TokenKind, // Access or refresh
    pub exp: i64,        // Expiration time
    pub iat: i64,        // Issued at
}

/// Why a token was rejected.
///
/// The distinction matters for logging and tests; over HTTP every variant
/// except `Internal` collapses to the same generic 401.
#[derive(ThisError, Debug)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("malformed token")]
    Malformed,

    #[error("wrong token kind: expected {expected:?}")]
    WrongKind { expected: TokenKind },

    #[error("token verification failed: {0}")]
    Internal(String),
}

impl From<TokenError> for Error {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::InvalidSignature | TokenError::Malformed | TokenError::WrongKind { .. } => {
                tracing::debug!("Token rejected: {err}");
                Error::Unauthenticated { message: None }
            }
            TokenError::Internal(operation) => Error::Internal { operation },
        }
    }
}

fn issue_token(subject: &str, kind: TokenKind, config: &Config) -> Result<String, Error> {
    let expiry = match kind {
        TokenKind::Access => config.auth.access_token_expiry,
        TokenKind::Refresh => config.auth.refresh_token_expiry,
    };

    let now = Utc::now();
    let claims = Claims {
        sub: subject.to_string(),
        kind,
        exp: (now + expiry).timestamp(),
        iat: now.timestamp(),
    };

    let secret_key = config.secret_key.as_ref().ok_or_else(|| Error::Internal {
        operation: "JWT tokens: secret_key is required".to_string(),
    })?;

    let key = EncodingKey::from_secret(secret_key.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("create JWT: {e}"),
    })
}

/// Create a short-lived access token for the given subject
pub fn issue_access_token(subject: &str, config: &Config) -> Result<String, Error> {
    issue_token(subject, TokenKind::Access, config)
}

/// Create a long-lived refresh token for the given subject
pub fn issue_refresh_token(subject: &str, config: &Config) -> Result<String, Error> {
    issue_token(subject, TokenKind::Refresh, config)
}

/// Verify a JWT and return its subject.
///
/// Rejects tokens whose kind does not match `expected_kind`. Uses zero clock
/// leeway: a token with `exp` in the past is expired, `exp >= now` is valid.
pub fn verify_token(token: &str, expected_kind: TokenKind, config: &Config) -> Result<String, TokenError> {
    let secret_key = config
        .secret_key
        .as_ref()
        .ok_or_else(|| TokenError::Internal("JWT tokens: secret_key is required".to_string()))?;

    let key = DecodingKey::from_secret(secret_key.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,

        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,

        // Structurally broken tokens and claim mismatches
        jsonwebtoken::errors::ErrorKind::InvalidToken
        | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
        | jsonwebtoken::errors::ErrorKind::InvalidIssuer
        | jsonwebtoken::errors::ErrorKind::InvalidAudience
        | jsonwebtoken::errors::ErrorKind::InvalidSubject
        | jsonwebtoken::errors::ErrorKind::ImmatureSignature
        | jsonwebtoken::errors::ErrorKind::Base64(_)
        | jsonwebtoken::errors::ErrorKind::Json(_)
        | jsonwebtoken::errors::ErrorKind::Utf8(_)
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => TokenError::Malformed,

        // Server errors - key issues, internal failures
        jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_)
        | jsonwebtoken::errors::ErrorKind::RsaFailedSigning
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithmName
        | jsonwebtoken::errors::ErrorKind::InvalidKeyFormat
        | jsonwebtoken::errors::ErrorKind::MissingAlgorithm
        | jsonwebtoken::errors::ErrorKind::Crypto(_) => TokenError::Internal(format!("JWT verification: {e}")),

        // Catch-all for any future error variants (default to server error for safety)
        _ => TokenError::Internal(format!("JWT verification (unknown error): {e}")),
    })?;

    if token_data.claims.kind != expected_kind {
        return Err(TokenError::WrongKind { expected: expected_kind });
    }

    Ok(token_data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn create_test_config() -> Config {
        Config {
            secret_key: Some("test-secret-key-for-jwt".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let config = create_test_config();

        let token = issue_access_token("alice@example.com", &config).unwrap();
        assert!(!token.is_empty());

        let subject = verify_token(&token, TokenKind::Access, &config).unwrap();
        assert_eq!(subject, "alice@example.com");
    }

    #[test]
    fn test_issue_and_verify_refresh_token() {
        let config = create_test_config();

        let token = issue_refresh_token("alice@example.com", &config).unwrap();
        let subject = verify_token(&token, TokenKind::Refresh, &config).unwrap();
        assert_eq!(subject, "alice@example.com");
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let config = create_test_config();

        let token = issue_refresh_token("alice@example.com", &config).unwrap();
        let result = verify_token(&token, TokenKind::Access, &config);
        assert!(matches!(result.unwrap_err(), TokenError::WrongKind { expected: TokenKind::Access }));
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let config = create_test_config();

        let token = issue_access_token("alice@example.com", &config).unwrap();
        let result = verify_token(&token, TokenKind::Refresh, &config);
        assert!(matches!(result.unwrap_err(), TokenError::WrongKind { .. }));
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let mut config = create_test_config();

        let token = issue_access_token("alice@example.com", &config).unwrap();

        // Try to verify with different secret
        config.secret_key = Some("different-secret".to_string());
        let result = verify_token(&token, TokenKind::Access, &config);
        assert!(matches!(result.unwrap_err(), TokenError::InvalidSignature));
    }

    #[test]
    fn test_verify_expired_token() {
        let config = create_test_config();

        // Manually create an expired token by setting exp in the past
        let now = Utc::now();
        let claims = Claims {
            sub: "alice@example.com".to_string(),
            kind: TokenKind::Access,
            exp: (now - chrono::Duration::seconds(3600)).timestamp(), // 1 hour ago
            iat: (now - chrono::Duration::seconds(7200)).timestamp(),
        };

        let secret_key = config.secret_key.as_ref().unwrap();
        let key = EncodingKey::from_secret(secret_key.as_bytes());
        let token = encode(&Header::default(), &claims, &key).unwrap();

        let result = verify_token(&token, TokenKind::Access, &config);
        assert!(matches!(result.unwrap_err(), TokenError::Expired));
    }

    #[test]
    fn test_verify_malformed_token() {
        let config = create_test_config();

        let malformed_tokens = vec!["not.a.token", "invalid", "", "too.many.parts.in.this.token"];

        for token in malformed_tokens {
            let result = verify_token(token, TokenKind::Access, &config);
            assert!(
                matches!(result.unwrap_err(), TokenError::Malformed),
                "Expected Malformed error for token: {}",
                token
            );
        }
    }

    #[test]
    fn test_rejections_collapse_to_unauthenticated() {
        let err: Error = TokenError::Expired.into();
        assert!(matches!(err, Error::Unauthenticated { message: None }));

        let err: Error = TokenError::Malformed.into();
        assert!(matches!(err, Error::Unauthenticated { message: None }));
    }
}
