// Upload lifecycle endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    app::AppState,
    models::{
        CreateUploadRequest, UpdateSummariesRequest, UpdateUploadStatusRequest, UploadResponse,
    },
    services::UploadService,
    utils::ServiceError,
};

/// Register a new upload
/// POST /api/v1/uploads
#[utoipa::path(
    post,
    path = "/v1/uploads",
    tag = "Uploads",
    operation_id = "createUpload",
    request_body = CreateUploadRequest,
    responses(
        (status = 201, description = "Upload registered as PENDING", body = UploadResponse),
        (status = 400, description = "Validation failed or owner does not exist")
    )
)]
pub async fn create_upload(
    State(state): State<AppState>,
    Json(request): Json<CreateUploadRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let upload = UploadService::new(state.diesel_pool.clone())
        .create_upload(request)
        .await?;

    Ok((StatusCode::CREATED, Json(UploadResponse::from(upload))))
}

/// Fetch one upload
/// GET /api/v1/uploads/{id}
#[utoipa::path(
    get,
    path = "/v1/uploads/{id}",
    tag = "Uploads",
    operation_id = "getUpload",
    params(("id" = Uuid, Path, description = "Upload id")),
    responses(
        (status = 200, description = "Upload found", body = UploadResponse),
        (status = 404, description = "Upload not found")
    )
)]
pub async fn get_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let upload = UploadService::new(state.diesel_pool.clone())
        .get_upload(id)
        .await?;

    Ok(Json(UploadResponse::from(upload)))
}

/// List a user's uploads, newest first
/// GET /api/v1/uploads/user/{user_id}
#[utoipa::path(
    get,
    path = "/v1/uploads/user/{user_id}",
    tag = "Uploads",
    operation_id = "listUploadsForUser",
    params(("user_id" = Uuid, Path, description = "Owning user id")),
    responses(
        (status = 200, description = "Uploads for the user, possibly empty", body = [UploadResponse])
    )
)]
pub async fn list_uploads_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let uploads = UploadService::new(state.diesel_pool.clone())
        .list_uploads_for_user(user_id)
        .await?;

    let responses: Vec<UploadResponse> = uploads.into_iter().map(UploadResponse::from).collect();
    Ok(Json(responses))
}

/// Move an upload through its status machine
/// PUT /api/v1/uploads/{id}/status
#[utoipa::path(
    put,
    path = "/v1/uploads/{id}/status",
    tag = "Uploads",
    operation_id = "updateUploadStatus",
    params(("id" = Uuid, Path, description = "Upload id")),
    request_body = UpdateUploadStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UploadResponse),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Upload not found")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUploadStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let upload = UploadService::new(state.diesel_pool.clone())
        .update_status(id, request)
        .await?;

    Ok(Json(UploadResponse::from(upload)))
}

/// Write the aggregate analysis counters
/// PUT /api/v1/uploads/{id}/summaries
#[utoipa::path(
    put,
    path = "/v1/uploads/{id}/summaries",
    tag = "Uploads",
    operation_id = "updateUploadSummaries",
    params(("id" = Uuid, Path, description = "Upload id")),
    request_body = UpdateSummariesRequest,
    responses(
        (status = 200, description = "Summaries updated", body = UploadResponse),
        (status = 404, description = "Upload not found")
    )
)]
pub async fn update_summaries(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSummariesRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let upload = UploadService::new(state.diesel_pool.clone())
        .update_analysis_summaries(id, request)
        .await?;

    Ok(Json(UploadResponse::from(upload)))
}

/// Delete an upload and its analysis results
/// DELETE /api/v1/uploads/{id}
#[utoipa::path(
    delete,
    path = "/v1/uploads/{id}",
    tag = "Uploads",
    operation_id = "deleteUpload",
    params(("id" = Uuid, Path, description = "Upload id")),
    responses(
        (status = 204, description = "Upload deleted (or already absent)")
    )
)]
pub async fn delete_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    UploadService::new(state.diesel_pool.clone())
        .delete_upload(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
