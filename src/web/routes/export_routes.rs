use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::db::services::export_service;
use crate::web::{AppError, AppState};

pub fn create_export_router() -> Router<Arc<AppState>> {
    Router::new().route("/export.csv", get(export_csv))
}

async fn export_csv(State(app_state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let rows = export_service::export_rows(&app_state.db)
        .await
        .map_err(|e| AppError::AggregationError(e.to_string()))?;

    let body = export_service::render_csv(&rows);
    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response())
}
