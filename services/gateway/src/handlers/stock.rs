use crate::csv::{csv_response, stocks_to_csv};
use crate::error::AppError;
use crate::models::InitializeForm;
use crate::state::AppState;
use axum::extract::State;
use axum::response::Response;
use axum::Form;

/// CSV dump of all stocks, ordered by last update
///
/// Useful for whole-population synchronization by downstream consumers.
pub async fn list_stocks(State(state): State<AppState>) -> Response {
    let mut stocks = state.simulator.snapshot().await;
    stocks.sort_by_key(|s| s.last_updated);
    csv_response(stocks_to_csv(&stocks))
}

/// (Re)generate the stock population
///
/// Discards any prior state and responds with the fresh population as CSV.
pub async fn initialize_stock(
    State(state): State<AppState>,
    Form(form): Form<InitializeForm>,
) -> Result<Response, AppError> {
    let stocks = state.simulator.initialize(form.amount).await?;
    tracing::info!(amount = stocks.len(), "stock population initialized");
    Ok(csv_response(stocks_to_csv(&stocks)))
}
