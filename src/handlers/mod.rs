pub mod api;
pub mod charts;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Summaries
        .route("/api/summary/by-category", get(api::summary_by_category))
        .route("/api/summary/monthly", get(api::monthly_summary))
        .route("/api/stats", get(api::spending_stats))
        // Chart-ready views
        .route("/api/comparison", get(charts::comparison))
        .route("/api/charts/pie", get(charts::pie))
        .route("/api/charts/bar", get(charts::bar))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
