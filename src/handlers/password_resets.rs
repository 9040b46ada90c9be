// Password reset endpoints. The request endpoint answers the same way for
// known and unknown emails so it cannot be used to probe for accounts.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::{
    app::AppState,
    models::{ConfirmPasswordResetRequest, RequestPasswordResetRequest},
    services::PasswordResetService,
    utils::ServiceError,
};

/// Start a password reset flow
/// POST /api/v1/password-resets/request
#[utoipa::path(
    post,
    path = "/v1/password-resets/request",
    tag = "Password Resets",
    operation_id = "requestPasswordReset",
    request_body = RequestPasswordResetRequest,
    responses(
        (status = 200, description = "Accepted; a token was issued if the email is registered"),
        (status = 400, description = "Malformed email")
    )
)]
pub async fn request_reset(
    State(state): State<AppState>,
    Json(request): Json<RequestPasswordResetRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;

    // The token itself goes out through the email collaborator; the HTTP
    // answer never distinguishes known from unknown emails.
    let _ = PasswordResetService::new(state.diesel_pool.clone())
        .create_reset_request(&request.email)
        .await?;

    Ok(Json(json!({
        "message": "If the email is registered, a reset link has been sent"
    })))
}

/// Check a reset token without consuming it
/// GET /api/v1/password-resets/validate/{token}
#[utoipa::path(
    get,
    path = "/v1/password-resets/validate/{token}",
    tag = "Password Resets",
    operation_id = "validateResetToken",
    params(("token" = String, Path, description = "Raw reset token")),
    responses(
        (status = 200, description = "Token is live"),
        (status = 400, description = "Token is invalid or expired")
    )
)]
pub async fn validate_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    PasswordResetService::new(state.diesel_pool.clone())
        .validate_token(&token)
        .await?;

    Ok(Json(json!({ "valid": true })))
}

/// Consume a reset token and set a new password
/// POST /api/v1/password-resets/reset
#[utoipa::path(
    post,
    path = "/v1/password-resets/reset",
    tag = "Password Resets",
    operation_id = "resetPassword",
    request_body = ConfirmPasswordResetRequest,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Token invalid/expired or password rejected")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ConfirmPasswordResetRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;

    PasswordResetService::new(state.diesel_pool.clone())
        .consume_token(&request.token, &request.new_password)
        .await?;

    Ok(Json(json!({
        "message": "Password has been reset"
    })))
}
