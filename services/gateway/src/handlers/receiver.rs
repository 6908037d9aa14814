use crate::error::AppError;
use crate::models::ReceiverQuery;
use axum::body::Bytes;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Webhook test sink
///
/// Echoes the request body with the status code given in the query, so
/// integrations can be exercised against arbitrary response statuses.
pub async fn receive(
    Query(query): Query<ReceiverQuery>,
    body: Bytes,
) -> Result<Response, AppError> {
    tracing::info!(
        status_code = query.status_code,
        bytes = body.len(),
        "receiver request"
    );

    let status = StatusCode::from_u16(query.status_code)
        .map_err(|_| AppError::BadRequest(format!("invalid status code {}", query.status_code)))?;

    Ok((status, body).into_response())
}
