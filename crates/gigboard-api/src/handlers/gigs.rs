//! Gig API handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use gigboard_models::{Gig, GigId, GigSummary};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::services::GigUpdate;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGigRequest {
    #[validate(length(min = 3, max = 120))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 4000))]
    pub description: String,
    #[validate(range(min = 1))]
    pub budget: i64,
}

pub async fn create_gig(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateGigRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Gig>>)> {
    req.validate()?;

    let gig = state
        .gigs
        .create_gig(&user.id, &req.title, &req.description, req.budget)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(gig, "Gig created successfully")),
    ))
}

pub async fn list_gigs(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<GigSummary>>>> {
    let gigs = state.gigs.list_gigs().await?;
    Ok(Json(ApiResponse::ok(gigs, "Gigs fetched successfully")))
}

pub async fn get_gig(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(gig_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Gig>>> {
    let gig = state.gigs.get_gig(&GigId::from_string(gig_id)).await?;
    Ok(Json(ApiResponse::ok(gig, "Gig fetched successfully")))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGigRequest {
    #[validate(length(min = 3, max = 120))]
    pub title: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub budget: Option<i64>,
}

pub async fn update_gig(
    State(state): State<AppState>,
    user: AuthUser,
    Path(gig_id): Path<String>,
    Json(req): Json<UpdateGigRequest>,
) -> ApiResult<Json<ApiResponse<Gig>>> {
    req.validate()?;

    let update = GigUpdate {
        title: req.title,
        description: req.description,
        budget: req.budget,
    };
    let gig = state
        .gigs
        .update_gig(&GigId::from_string(gig_id), &user.id, update)
        .await?;

    Ok(Json(ApiResponse::ok(gig, "Gig updated successfully")))
}

pub async fn delete_gig(
    State(state): State<AppState>,
    user: AuthUser,
    Path(gig_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Gig>>> {
    let gig = state
        .gigs
        .delete_gig(&GigId::from_string(gig_id), &user.id)
        .await?;
    Ok(Json(ApiResponse::ok(gig, "Gig deleted successfully")))
}
