// Subscription endpoints, shaped for a payment-provider webhook consumer.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    app::AppState,
    models::{SubscriptionResponse, UpsertSubscriptionRequest},
    services::SubscriptionService,
    utils::ServiceError,
};

/// Create or replace a user's subscription
/// POST /api/v1/subscriptions
#[utoipa::path(
    post,
    path = "/v1/subscriptions",
    tag = "Subscriptions",
    operation_id = "upsertSubscription",
    request_body = UpsertSubscriptionRequest,
    responses(
        (status = 200, description = "Subscription upserted, premium flag synced", body = SubscriptionResponse),
        (status = 400, description = "Validation failed or user does not exist")
    )
)]
pub async fn upsert_subscription(
    State(state): State<AppState>,
    Json(request): Json<UpsertSubscriptionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let subscription = SubscriptionService::new(state.diesel_pool.clone())
        .upsert_subscription(request)
        .await?;

    Ok(Json(SubscriptionResponse::from(subscription)))
}

/// Fetch a user's subscription
/// GET /api/v1/subscriptions/user/{user_id}
#[utoipa::path(
    get,
    path = "/v1/subscriptions/user/{user_id}",
    tag = "Subscriptions",
    operation_id = "getSubscriptionForUser",
    params(("user_id" = Uuid, Path, description = "Owning user id")),
    responses(
        (status = 200, description = "Subscription found", body = SubscriptionResponse),
        (status = 404, description = "No subscription for the user")
    )
)]
pub async fn get_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let subscription = SubscriptionService::new(state.diesel_pool.clone())
        .get_subscription_for_user(user_id)
        .await?;

    Ok(Json(SubscriptionResponse::from(subscription)))
}

/// Cancel a user's subscription
/// PUT /api/v1/subscriptions/user/{user_id}/cancel
#[utoipa::path(
    put,
    path = "/v1/subscriptions/user/{user_id}/cancel",
    tag = "Subscriptions",
    operation_id = "cancelSubscription",
    params(("user_id" = Uuid, Path, description = "Owning user id")),
    responses(
        (status = 200, description = "Subscription canceled", body = SubscriptionResponse),
        (status = 404, description = "No subscription for the user")
    )
)]
pub async fn cancel(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let subscription = SubscriptionService::new(state.diesel_pool.clone())
        .cancel_subscription(user_id)
        .await?;

    Ok(Json(SubscriptionResponse::from(subscription)))
}
