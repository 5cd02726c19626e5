use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Form, Router,
    extract::State,
    response::Html,
    routing::{get, post},
};
use tera::Context;
use tracing::info;

use crate::db::services::scoring_service;
use crate::features::{FEATURE_NAMES, FeatureVector};
use crate::web::{AppError, AppState};

pub fn create_predict_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
}

async fn index(State(app_state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let mut context = Context::new();
    context.insert("feature_names", &FEATURE_NAMES);
    let body = app_state.templates.render("index.html", &context)?;
    Ok(Html(body))
}

/// Validates the submitted form, scores it and persists the result, then
/// renders the outcome page. A validation failure never reaches the
/// database; a persistence failure surfaces as a failed submission.
async fn predict(
    State(app_state): State<Arc<AppState>>,
    Form(payload): Form<HashMap<String, String>>,
) -> Result<Html<String>, AppError> {
    let features = FeatureVector::from_form(&payload)?;

    let outcome = scoring_service::score_and_record(
        &app_state.db,
        app_state.model.as_deref(),
        &features,
        app_state.config.risk_threshold,
    )
    .await?;

    info!(
        patient_id = outcome.patient_id,
        proba = outcome.proba,
        label = outcome.label,
        "scored submission"
    );

    let mut context = Context::new();
    context.insert("proba", &format!("{:.4}", outcome.proba));
    context.insert("label", outcome.label_text());
    context.insert("threshold", &outcome.threshold);
    let body = app_state.templates.render("result.html", &context)?;
    Ok(Html(body))
}
