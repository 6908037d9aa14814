use crate::handlers::{receiver, stock, trigger};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(stock::list_stocks))
        .route("/initialize-stock", post(stock::initialize_stock))
        .route("/trigger", post(trigger::trigger_change))
        .route("/receiver", post(receiver::receive))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
