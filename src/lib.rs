// Library exports for the Gramlytics backend core.

pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::{initialize_app_state, AppState};
pub use app_config::{AppConfig, CONFIG};
pub use db::{DieselDatabaseConfig, DieselPool};
pub use models::{
    AnalysisDataType, AnalysisResult, PasswordReset, Subscription, UploadStatus, User,
    UserDataUpload,
};
pub use services::{
    AnalysisResultService, PasswordResetService, SubscriptionService, UploadService, UserService,
};
pub use utils::ServiceError;

// Re-export handler route builders
pub use handlers::{
    analysis_result_routes, password_reset_routes, subscription_routes, upload_routes, user_routes,
};

/// Pool connectivity health check
/// GET /api/v1/health
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    use axum::http::StatusCode;
    use axum::Json;

    let timestamp = chrono::Utc::now().to_rfc3339();

    match db::check_diesel_health(&state.diesel_pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "service": "gramlytics-backend",
                "timestamp": timestamp,
                "components": {
                    "postgresql": {
                        "status": "healthy",
                        "max_connections": state.max_connections,
                        "error": null
                    }
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "degraded",
                "service": "gramlytics-backend",
                "timestamp": timestamp,
                "components": {
                    "postgresql": {
                        "status": "unhealthy",
                        "error": format!("Database connection failed: {}", e)
                    }
                }
            })),
        ),
    }
}

/// Assemble the full `/api/v1` router.
pub fn api_router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/health", axum::routing::get(health_check))
        .nest("/users", user_routes())
        .nest("/uploads", upload_routes())
        .nest("/analysis-results", analysis_result_routes())
        .nest("/subscriptions", subscription_routes())
        .nest("/password-resets", password_reset_routes())
}
