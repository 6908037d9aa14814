use crate::csv::{changes_to_csv, csv_response};
use crate::error::AppError;
use crate::models::TriggerForm;
use crate::state::AppState;
use axum::extract::State;
use axum::response::Response;
use axum::Form;
use types::dispatch::DispatchConfig;

/// Randomly mutate stocks and optionally notify a webhook target
///
/// Dispatch parameters are validated before anything is mutated, so a bad
/// webhook request leaves the store untouched. Delivery runs as a
/// background task: the changed records are returned immediately as CSV,
/// and the dispatch report is logged when the round finishes. A client
/// disconnect therefore never cuts off in-flight deliveries.
pub async fn trigger_change(
    State(state): State<AppState>,
    Form(form): Form<TriggerForm>,
) -> Result<Response, AppError> {
    let config = form
        .webhook_url
        .as_deref()
        .map(|url| DispatchConfig::new(url, form.concurrency, form.sleep, form.duplicate))
        .transpose()?;

    let changes = state
        .simulator
        .change_randomly(form.number_to_change)
        .await?;

    if let Some(config) = config {
        let simulator = state.simulator.clone();
        let batch = changes.clone();
        tokio::spawn(async move {
            let report = simulator.dispatch(batch, config).await;
            tracing::info!(
                job_id = %report.job_id,
                delivered = report.delivered_count(),
                failed = report.failed_count(),
                groups = report.groups_dispatched,
                "background webhook dispatch finished"
            );
        });
    }

    Ok(csv_response(changes_to_csv(&changes)))
}
