use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, SessionUser};
use crate::database;
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::models::{NewUser, UserResponse};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registers a new user and returns the created row, password omitted.
pub async fn signup(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> ApiResult<Json<Value>> {
    let user = db::run(&state.pool, move |conn| database::add_user(conn, &new_user)).await?;
    log::info!("Created user {}", user.id);
    Ok(Json(json!({ "user": UserResponse::from(user) })))
}

/// Exchanges credentials for a session token. Passwords are hashed
/// upstream; the comparison here is exact.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let email = body.email.clone();
    let user = db::run(&state.pool, move |conn| {
        database::get_user_with_email(conn, &email)
    })
    .await?
    .ok_or_else(|| ApiError::Unauthorized("invalid email or password".to_string()))?;

    if user.password != body.password {
        return Err(ApiError::Unauthorized("invalid email or password".to_string()));
    }

    let token = auth::create_token(user.id, &state.config.jwt_secret)
        .map_err(|e| ApiError::Internal(format!("token creation failed: {}", e)))?;
    Ok(Json(json!({ "token": token, "user": UserResponse::from(user) })))
}

/// Returns the session user's own record.
pub async fn me(
    State(state): State<AppState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
) -> ApiResult<Json<Value>> {
    let user = db::run(&state.pool, move |conn| {
        database::get_user_with_id(conn, user_id)
    })
    .await?
    .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;
    Ok(Json(json!({ "user": UserResponse::from(user) })))
}
