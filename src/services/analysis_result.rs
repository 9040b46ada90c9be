// Analysis result store. Saves are keyed by row id: a request carrying an id
// overwrites that row, a request without one inserts. The parent upload must
// exist at write time, checked in the same transaction as the write.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DieselPool,
    models::{AnalysisDataType, AnalysisResult, NewAnalysisResult, SaveAnalysisResultRequest},
    schema::{analysis_results, user_data_uploads},
    utils::ServiceError,
};

#[derive(Clone)]
pub struct AnalysisResultService {
    pool: DieselPool,
}

impl AnalysisResultService {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    /// Persist one analysis result. Insert-or-overwrite on the row id, with
    /// the upload-existence check and the write in a single transaction.
    #[instrument(skip(self, request))]
    pub async fn save_result(
        &self,
        request: SaveAnalysisResultRequest,
    ) -> Result<AnalysisResult, ServiceError> {
        request.validate()?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        conn.transaction::<AnalysisResult, ServiceError, _>(|tx| {
            Box::pin(async move {
                let upload_exists: bool = diesel::select(diesel::dsl::exists(
                    user_data_uploads::table
                        .filter(user_data_uploads::id.eq(request.upload_id)),
                ))
                .get_result(tx)
                .await
                .map_err(|e| {
                    ServiceError::DatabaseError(format!("Failed to check upload: {}", e))
                })?;

                if !upload_exists {
                    return Err(ServiceError::ValidationError(format!(
                        "Upload {} does not exist",
                        request.upload_id
                    )));
                }

                let row = NewAnalysisResult {
                    id: request.id.unwrap_or_else(Uuid::new_v4),
                    upload_id: request.upload_id,
                    data_type: request.data_type,
                    target_identifier: request.target_identifier,
                    value_numeric: request.value_numeric,
                    value_text: request.value_text,
                    meta_json: request.meta_json,
                    created_at: Utc::now(),
                };

                // created_at stays at first-write time so the earliest-first
                // ordering of list/find queries is stable across overwrites
                diesel::insert_into(analysis_results::table)
                    .values(&row)
                    .on_conflict(analysis_results::id)
                    .do_update()
                    .set((
                        analysis_results::upload_id.eq(row.upload_id),
                        analysis_results::data_type.eq(row.data_type),
                        analysis_results::target_identifier.eq(row.target_identifier.clone()),
                        analysis_results::value_numeric.eq(row.value_numeric),
                        analysis_results::value_text.eq(row.value_text.clone()),
                        analysis_results::meta_json.eq(row.meta_json.clone()),
                    ))
                    .get_result(tx)
                    .await
                    .map_err(|e| {
                        ServiceError::DatabaseError(format!("Failed to save result: {}", e))
                    })
            })
        })
        .await
    }

    pub async fn get_result(&self, result_id: Uuid) -> Result<AnalysisResult, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        analysis_results::table
            .find(result_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to load result: {}", e)))?
            .ok_or(ServiceError::NotFound)
    }

    /// All results for an upload in insertion order.
    pub async fn list_by_upload(
        &self,
        upload_id: Uuid,
    ) -> Result<Vec<AnalysisResult>, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        analysis_results::table
            .filter(analysis_results::upload_id.eq(upload_id))
            .order((analysis_results::created_at.asc(), analysis_results::id.asc()))
            .load(&mut conn)
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to list results: {}", e)))
    }

    pub async fn list_by_upload_and_type(
        &self,
        upload_id: Uuid,
        data_type: AnalysisDataType,
    ) -> Result<Vec<AnalysisResult>, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        analysis_results::table
            .filter(analysis_results::upload_id.eq(upload_id))
            .filter(analysis_results::data_type.eq(data_type))
            .order((analysis_results::created_at.asc(), analysis_results::id.asc()))
            .load(&mut conn)
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to list results: {}", e)))
    }

    /// First matching result for an (upload, type, target) triple. Duplicates
    /// are permitted in the store, so the earliest row wins, with the id as a
    /// tiebreak to keep the answer stable.
    pub async fn find_one(
        &self,
        upload_id: Uuid,
        data_type: AnalysisDataType,
        target_identifier: &str,
    ) -> Result<Option<AnalysisResult>, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        analysis_results::table
            .filter(analysis_results::upload_id.eq(upload_id))
            .filter(analysis_results::data_type.eq(data_type))
            .filter(analysis_results::target_identifier.eq(target_identifier))
            .order((analysis_results::created_at.asc(), analysis_results::id.asc()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to find result: {}", e)))
    }
}
