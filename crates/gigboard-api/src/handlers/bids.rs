//! Bid API handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use gigboard_models::{Bid, BidId, Gig, GigId};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBidRequest {
    pub gig_id: String,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    #[validate(range(min = 1))]
    pub price: i64,
}

pub async fn create_bid(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateBidRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Bid>>)> {
    req.validate()?;

    let bid = state
        .bids
        .create_bid(
            &GigId::from_string(req.gig_id),
            &user.id,
            &req.message,
            req.price,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(bid, "Bid created successfully")),
    ))
}

/// Bids for one gig together with the gig record.
#[derive(Debug, Serialize)]
pub struct BidListResponse {
    pub gig: Gig,
    pub bids: Vec<Bid>,
}

pub async fn list_bids(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(gig_id): Path<String>,
) -> ApiResult<Json<ApiResponse<BidListResponse>>> {
    let (gig, bids) = state
        .bids
        .list_bids_for_gig(&GigId::from_string(gig_id))
        .await?;
    Ok(Json(ApiResponse::ok(
        BidListResponse { gig, bids },
        "Bids fetched successfully",
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HireRequest {
    pub bid_id: String,
}

pub async fn hire(
    State(state): State<AppState>,
    user: AuthUser,
    Path(gig_id): Path<String>,
    Json(req): Json<HireRequest>,
) -> ApiResult<Json<ApiResponse<Bid>>> {
    let outcome = state
        .hiring
        .hire(
            &GigId::from_string(gig_id),
            &BidId::from_string(req.bid_id),
            &user.id,
        )
        .await?;

    Ok(Json(ApiResponse::ok(
        outcome.bid,
        "Bid hired successfully",
    )))
}
