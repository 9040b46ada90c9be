// User account endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    app::AppState,
    models::{CreateUserRequest, UpdateUserRequest, UserResponse},
    services::UserService,
    utils::ServiceError,
};

/// Register a new user
/// POST /api/v1/users
#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "Users",
    operation_id = "createUser",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = UserService::new(state.diesel_pool.clone())
        .create_user(request)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Fetch a user by id
/// GET /api/v1/users/{id}
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    tag = "Users",
    operation_id = "getUser",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = UserService::new(state.diesel_pool.clone()).get_user(id).await?;

    Ok(Json(UserResponse::from(user)))
}

/// List all users
/// GET /api/v1/users
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "Users",
    operation_id = "listUsers",
    responses(
        (status = 200, description = "All users", body = [UserResponse])
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let users = UserService::new(state.diesel_pool.clone()).list_users().await?;

    let responses: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(responses))
}

/// Update a user's email or premium flag
/// PUT /api/v1/users/{id}
#[utoipa::path(
    put,
    path = "/v1/users/{id}",
    tag = "Users",
    operation_id = "updateUser",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = UserService::new(state.diesel_pool.clone())
        .update_user(id, request)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete a user and all of their data
/// DELETE /api/v1/users/{id}
#[utoipa::path(
    delete,
    path = "/v1/users/{id}",
    tag = "Users",
    operation_id = "deleteUser",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted (or already absent)")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    UserService::new(state.diesel_pool.clone())
        .delete_user(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
