use std::sync::Arc;

use axum::{Router, extract::State, response::Html, routing::get};
use tera::Context;

use crate::db::services::history_service::{self, DEFAULT_HISTORY_LIMIT};
use crate::web::{AppError, AppState};

pub fn create_history_router() -> Router<Arc<AppState>> {
    Router::new().route("/history", get(history))
}

async fn history(State(app_state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let snapshot = history_service::latest_per_patient(&app_state.db, DEFAULT_HISTORY_LIMIT)
        .await
        .map_err(|e| AppError::AggregationError(e.to_string()))?;

    let mut context = Context::new();
    context.insert("rows", &snapshot.rows);
    context.insert("chart_labels", &snapshot.chart_labels);
    context.insert("chart_values", &snapshot.chart_values);
    context.insert("threshold", &app_state.config.risk_threshold);
    let body = app_state.templates.render("history.html", &context)?;
    Ok(Html(body))
}
