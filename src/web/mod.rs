use std::sync::Arc;

use axum::{Router, http::Method, routing::get};
use sea_orm::DatabaseConnection;
use tera::Tera;
use tower_http::cors::{Any, CorsLayer};

use crate::model::RiskModel;
use crate::server::config::ServerConfig;
use crate::web::routes::{
    export_routes::create_export_router, history_routes::create_history_router,
    predict_routes::create_predict_router,
};

pub mod error;
pub mod routes;

pub use error::AppError;

/// Shared per-process state. The model is loaded once at startup and never
/// mutated afterwards, so it needs no locking; `None` means the process is
/// serving degraded (all-zero) scores.
pub struct AppState {
    pub db: DatabaseConnection,
    pub model: Option<Arc<RiskModel>>,
    pub templates: Arc<Tera>,
    pub config: Arc<ServerConfig>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health_check_handler))
        .merge(create_predict_router())
        .merge(create_history_router())
        .merge(create_export_router())
        .layer(cors)
        .with_state(app_state)
}
