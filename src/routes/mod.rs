mod health;
pub mod relay;

use axum::middleware as axum_mw;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::no_cache::no_cache_middleware;
use crate::state::AppState;

/// Build the application router. Protocol paths are matched by the fallback so
/// the dispatcher owns validation of every segment.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/version", get(health::version))
        .fallback(relay::dispatch)
        .layer(axum_mw::from_fn(no_cache_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
