use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::AppState;

/// Session user id attached to request extensions by [`authenticate`].
#[derive(Debug, Clone, Copy)]
pub struct SessionUser(pub i32);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // User id
    exp: usize,  // Expiration time
}

pub fn create_token(user_id: i32, jwt_secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<i32, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    token_data
        .claims
        .sub
        .parse::<i32>()
        .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidSubject.into())
}

fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ")
}

/// Session middleware for the protected routes. Validates the bearer token
/// and attaches the caller's user id as a [`SessionUser`] extension; the
/// request never reaches a handler without one.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".to_string()))?;
    let token = bearer_token(header_value)
        .ok_or_else(|| ApiError::Unauthorized("invalid Authorization header format".to_string()))?;
    let user_id = validate_token(token, &state.config.jwt_secret)
        .map_err(|_| ApiError::Unauthorized("invalid or expired token".to_string()))?;

    log::info!("Authenticated user {}", user_id);
    request.extensions_mut().insert(SessionUser(user_id));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let token = create_token(42, "test-secret").unwrap();
        assert_eq!(validate_token(&token, "test-secret").unwrap(), 42);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = create_token(42, "test-secret").unwrap();
        assert!(validate_token(&token, "other-secret").is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(validate_token("not-a-token", "test-secret").is_err());
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(bearer_token("Token abc123"), None);
        assert_eq!(bearer_token("bearer abc123"), None);
    }
}
