//! CSV rendering for the stock endpoints
//!
//! Rows carry `id,symbol,price,last_updated` with RFC 3339 timestamps.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::SecondsFormat;
use types::change::ChangeRecord;
use types::stock::Stock;

pub const CSV_HEADER: &str = "id,symbol,price,last_updated";

/// Render a stock population as CSV
pub fn stocks_to_csv(stocks: &[Stock]) -> String {
    let mut out = String::with_capacity(stocks.len() * 48 + CSV_HEADER.len() + 1);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for stock in stocks {
        out.push_str(&format!(
            "{},{},{},{}\n",
            stock.id,
            stock.symbol,
            stock.price,
            stock.last_updated.to_rfc3339_opts(SecondsFormat::Micros, true)
        ));
    }
    out
}

/// Render a batch of changes as CSV, one row per change with the new price
pub fn changes_to_csv(changes: &[ChangeRecord]) -> String {
    let mut out = String::with_capacity(changes.len() * 48 + CSV_HEADER.len() + 1);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for change in changes {
        out.push_str(&format!(
            "{},{},{},{}\n",
            change.stock_id,
            change.symbol,
            change.new_price,
            change.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
        ));
    }
    out
}

/// Wrap a CSV body in a text/csv response
pub fn csv_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response()
}
