pub mod calculate;
pub mod convert;
pub mod ddays;
pub mod error;
pub mod extract;
pub mod identity;
pub mod market;
pub mod middleware;
pub mod posts;
pub mod requests;
pub mod stats;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};
use gyemini_db::Database;
use gyemini_market::MarketClient;
use serde_json::{Value, json};
use tracing::error;

use crate::error::ApiError;
use crate::middleware::require_identity;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub token_secret: String,
    pub market: MarketClient,
}

/// Every endpoint, mounted under `/api`.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/identity", post(identity::create_identity))
        .route("/posts", get(posts::list_posts))
        .route("/posts/{id}", get(posts::get_post))
        .route("/requests", get(requests::list_requests).post(requests::create_request))
        .route("/calculator-stats", get(stats::list_stats).post(stats::record_click))
        .route("/exchange-rates", get(market::exchange_rates))
        .route("/market-index", get(market::market_index))
        .route("/ipo", get(market::ipo_schedule))
        .route("/calculate", get(calculate::describe).post(calculate::calculate));

    let identity_routes = Router::new()
        .route("/ddays", get(ddays::list_ddays).post(ddays::create_dday))
        .route("/ddays/{id}", delete(ddays::delete_dday))
        .route("/posts", post(posts::create_post))
        .route("/posts/{id}", put(posts::update_post).delete(posts::delete_post))
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_identity));

    Router::new()
        .nest("/api", public_routes.merge(identity_routes))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run blocking DB work off the async runtime.
pub(crate) async fn run_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow::anyhow!("blocking task failed"))
        })?
        .map_err(ApiError::Internal)
}
