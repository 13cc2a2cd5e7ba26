//! Registration and login.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use gigboard_models::User;
use gigboard_store::user_repo;

use crate::auth::{digest_password, verify_password};
use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<User>>)> {
    req.validate()?;

    let user = User::new(&req.name, &req.email, digest_password(&req.password));
    match user_repo::insert(state.store.pool(), &user).await {
        Ok(()) => {}
        Err(e) if e.is_unique_violation() => {
            return Err(ApiError::conflict("User already exists"));
        }
        Err(e) => return Err(e.into()),
    }
    info!(user = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(user, "User created successfully")),
    ))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    req.validate()?;

    let user = user_repo::find_by_email(state.store.pool(), &req.email)
        .await?
        .ok_or_else(|| ApiError::unauthenticated("User not found"))?;

    if !verify_password(&req.password, &user.password_digest) {
        return Err(ApiError::unauthenticated("Invalid password"));
    }

    let token = state.keys.issue(&user.id)?;
    Ok(Json(ApiResponse::ok(
        LoginResponse { user, token },
        "Login successful",
    )))
}
