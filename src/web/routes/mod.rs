pub mod export_routes;
pub mod history_routes;
pub mod predict_routes;
