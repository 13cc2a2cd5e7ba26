//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{auth, bids, gigs, health};
use crate::middleware::{cors_layer, rate_limit_middleware, request_logging, RateLimiterCache};
use crate::state::AppState;
use crate::ws::ws_connect;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let gig_routes = Router::new()
        .route("/gigs", post(gigs::create_gig).get(gigs::list_gigs))
        .route(
            "/gigs/:gig_id",
            get(gigs::get_gig)
                .put(gigs::update_gig)
                .delete(gigs::delete_gig),
        );

    let bid_routes = Router::new()
        .route("/bids", post(bids::create_bid))
        .route("/bids/:gig_id", get(bids::list_bids))
        .route("/bids/:gig_id/hire", patch(bids::hire));

    let rate_limiter = Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(gig_routes)
        .merge(bid_routes)
        .route("/health", get(health::health))
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let ws_routes = Router::new().route("/ws", get(ws_connect));

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready));

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .merge(health_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
