// Analysis result endpoints. The data type appears in paths as its symbolic
// name (UNFOLLOWER, CLOSE_FRIEND_ITEM, ...).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    app::AppState,
    models::{AnalysisDataType, AnalysisResultResponse, SaveAnalysisResultRequest},
    services::AnalysisResultService,
    utils::ServiceError,
};

fn parse_data_type(raw: &str) -> Result<AnalysisDataType, ServiceError> {
    AnalysisDataType::from_str(raw).map_err(ServiceError::ValidationError)
}

/// Save (insert or overwrite) an analysis result
/// POST /api/v1/analysis-results
#[utoipa::path(
    post,
    path = "/v1/analysis-results",
    tag = "Analysis Results",
    operation_id = "saveAnalysisResult",
    request_body = SaveAnalysisResultRequest,
    responses(
        (status = 201, description = "Result saved", body = AnalysisResultResponse),
        (status = 400, description = "Validation failed or upload does not exist")
    )
)]
pub async fn save_result(
    State(state): State<AppState>,
    Json(request): Json<SaveAnalysisResultRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let result = AnalysisResultService::new(state.diesel_pool.clone())
        .save_result(request)
        .await?;

    Ok((StatusCode::CREATED, Json(AnalysisResultResponse::from(result))))
}

/// Fetch one analysis result
/// GET /api/v1/analysis-results/{id}
#[utoipa::path(
    get,
    path = "/v1/analysis-results/{id}",
    tag = "Analysis Results",
    operation_id = "getAnalysisResult",
    params(("id" = Uuid, Path, description = "Result id")),
    responses(
        (status = 200, description = "Result found", body = AnalysisResultResponse),
        (status = 404, description = "Result not found")
    )
)]
pub async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let result = AnalysisResultService::new(state.diesel_pool.clone())
        .get_result(id)
        .await?;

    Ok(Json(AnalysisResultResponse::from(result)))
}

/// All results for an upload in insertion order
/// GET /api/v1/analysis-results/upload/{upload_id}
#[utoipa::path(
    get,
    path = "/v1/analysis-results/upload/{upload_id}",
    tag = "Analysis Results",
    operation_id = "listResultsByUpload",
    params(("upload_id" = Uuid, Path, description = "Parent upload id")),
    responses(
        (status = 200, description = "Results for the upload", body = [AnalysisResultResponse])
    )
)]
pub async fn list_by_upload(
    State(state): State<AppState>,
    Path(upload_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let results = AnalysisResultService::new(state.diesel_pool.clone())
        .list_by_upload(upload_id)
        .await?;

    let responses: Vec<AnalysisResultResponse> =
        results.into_iter().map(AnalysisResultResponse::from).collect();
    Ok(Json(responses))
}

/// Results for an upload filtered by data type
/// GET /api/v1/analysis-results/upload/{upload_id}/type/{data_type}
#[utoipa::path(
    get,
    path = "/v1/analysis-results/upload/{upload_id}/type/{data_type}",
    tag = "Analysis Results",
    operation_id = "listResultsByUploadAndType",
    params(
        ("upload_id" = Uuid, Path, description = "Parent upload id"),
        ("data_type" = String, Path, description = "Symbolic data type name")
    ),
    responses(
        (status = 200, description = "Filtered results", body = [AnalysisResultResponse]),
        (status = 400, description = "Unknown data type")
    )
)]
pub async fn list_by_upload_and_type(
    State(state): State<AppState>,
    Path((upload_id, data_type)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ServiceError> {
    let data_type = parse_data_type(&data_type)?;

    let results = AnalysisResultService::new(state.diesel_pool.clone())
        .list_by_upload_and_type(upload_id, data_type)
        .await?;

    let responses: Vec<AnalysisResultResponse> =
        results.into_iter().map(AnalysisResultResponse::from).collect();
    Ok(Json(responses))
}

/// First result for an (upload, type, target) triple
/// GET /api/v1/analysis-results/upload/{upload_id}/type/{data_type}/target/{target}
#[utoipa::path(
    get,
    path = "/v1/analysis-results/upload/{upload_id}/type/{data_type}/target/{target}",
    tag = "Analysis Results",
    operation_id = "findAnalysisResult",
    params(
        ("upload_id" = Uuid, Path, description = "Parent upload id"),
        ("data_type" = String, Path, description = "Symbolic data type name"),
        ("target" = String, Path, description = "Target identifier")
    ),
    responses(
        (status = 200, description = "Earliest matching result", body = AnalysisResultResponse),
        (status = 400, description = "Unknown data type"),
        (status = 404, description = "No matching result")
    )
)]
pub async fn find_one(
    State(state): State<AppState>,
    Path((upload_id, data_type, target)): Path<(Uuid, String, String)>,
) -> Result<impl IntoResponse, ServiceError> {
    let data_type = parse_data_type(&data_type)?;

    let result = AnalysisResultService::new(state.diesel_pool.clone())
        .find_one(upload_id, data_type, &target)
        .await?
        .ok_or(ServiceError::NotFound)?;

    Ok(Json(AnalysisResultResponse::from(result)))
}
