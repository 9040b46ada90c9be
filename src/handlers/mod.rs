pub mod analysis_results;
pub mod password_resets;
pub mod subscriptions;
pub mod uploads;
pub mod users;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::app::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(users::create_user).get(users::list_users))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(uploads::create_upload))
        .route("/{id}", get(uploads::get_upload).delete(uploads::delete_upload))
        .route("/user/{user_id}", get(uploads::list_uploads_for_user))
        .route("/{id}/status", put(uploads::update_status))
        .route("/{id}/summaries", put(uploads::update_summaries))
}

pub fn analysis_result_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(analysis_results::save_result))
        .route("/{id}", get(analysis_results::get_result))
        .route(
            "/upload/{upload_id}",
            get(analysis_results::list_by_upload),
        )
        .route(
            "/upload/{upload_id}/type/{data_type}",
            get(analysis_results::list_by_upload_and_type),
        )
        .route(
            "/upload/{upload_id}/type/{data_type}/target/{target}",
            get(analysis_results::find_one),
        )
}

pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(subscriptions::upsert_subscription))
        .route("/user/{user_id}", get(subscriptions::get_for_user))
        .route("/user/{user_id}/cancel", put(subscriptions::cancel))
}

pub fn password_reset_routes() -> Router<AppState> {
    Router::new()
        .route("/request", post(password_resets::request_reset))
        .route("/validate/{token}", get(password_resets::validate_token))
        .route("/reset", post(password_resets::reset_password))
}
