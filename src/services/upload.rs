// Upload lifecycle service. Owns every query against user_data_uploads and
// enforces the status transition rules at the only write path for status.

use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DieselPool,
    models::{
        CreateUploadRequest, NewUserDataUpload, UpdateSummariesRequest, UpdateUploadStatusRequest,
        UserDataUpload,
    },
    schema::{analysis_results, user_data_uploads, users},
    utils::{trim_and_validate_field, trim_optional_field, ServiceError},
};

#[derive(Clone)]
pub struct UploadService {
    pool: DieselPool,
}

impl UploadService {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    /// Register a new upload for a user. The row always starts PENDING with a
    /// server-side upload time, whatever the caller sends. The owner check
    /// and the insert share one transaction so a concurrently deleted owner
    /// still surfaces as a validation error.
    #[instrument(skip(self, request))]
    pub async fn create_upload(
        &self,
        request: CreateUploadRequest,
    ) -> Result<UserDataUpload, ServiceError> {
        request.validate()?;

        let file_name = trim_and_validate_field(&request.file_name, "file_name")
            .map_err(ServiceError::ValidationError)?;
        let file_path = trim_and_validate_field(&request.file_path, "file_path")
            .map_err(ServiceError::ValidationError)?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        let upload = conn
            .transaction::<UserDataUpload, ServiceError, _>(|tx| {
                Box::pin(async move {
                    let owner_exists: bool = diesel::select(diesel::dsl::exists(
                        users::table.filter(users::id.eq(request.user_id)),
                    ))
                    .get_result(tx)
                    .await
                    .map_err(|e| {
                        ServiceError::DatabaseError(format!("Failed to check user: {}", e))
                    })?;

                    if !owner_exists {
                        return Err(ServiceError::ValidationError(format!(
                            "User {} does not exist",
                            request.user_id
                        )));
                    }

                    let new_upload = NewUserDataUpload::new(
                        request.user_id,
                        file_name,
                        file_path,
                        request.declared_file_type,
                    );

                    diesel::insert_into(user_data_uploads::table)
                        .values(&new_upload)
                        .get_result(tx)
                        .await
                        .map_err(|e| {
                            ServiceError::DatabaseError(format!("Failed to create upload: {}", e))
                        })
                })
            })
            .await?;

        tracing::info!(
            upload_id = %upload.id,
            user_id = %upload.user_id,
            file_name = %upload.file_name,
            "Upload registered"
        );

        Ok(upload)
    }

    pub async fn get_upload(&self, upload_id: Uuid) -> Result<UserDataUpload, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        user_data_uploads::table
            .find(upload_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to load upload: {}", e)))?
            .ok_or(ServiceError::NotFound)
    }

    /// All uploads belonging to a user, newest first.
    pub async fn list_uploads_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserDataUpload>, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        user_data_uploads::table
            .filter(user_data_uploads::user_id.eq(user_id))
            .order(user_data_uploads::upload_time.desc())
            .load(&mut conn)
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to list uploads: {}", e)))
    }

    /// Move an upload to a new status. The current row is read and the write
    /// performed inside one transaction so concurrent updaters serialize;
    /// a transition the state machine forbids is a validation error.
    #[instrument(skip(self, request))]
    pub async fn update_status(
        &self,
        upload_id: Uuid,
        request: UpdateUploadStatusRequest,
    ) -> Result<UserDataUpload, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        let updated = conn
            .transaction::<UserDataUpload, ServiceError, _>(|tx| {
                Box::pin(async move {
                    let current: UserDataUpload = user_data_uploads::table
                        .find(upload_id)
                        .for_update()
                        .first(tx)
                        .await
                        .optional()
                        .map_err(|e| {
                            ServiceError::DatabaseError(format!("Failed to load upload: {}", e))
                        })?
                        .ok_or(ServiceError::NotFound)?;

                    if !current.status.can_transition_to(request.new_status) {
                        return Err(ServiceError::ValidationError(format!(
                            "Invalid status transition: {} -> {}",
                            current.status.as_str(),
                            request.new_status.as_str()
                        )));
                    }

                    let error_message = trim_optional_field(request.error_message.as_ref());

                    diesel::update(user_data_uploads::table.find(upload_id))
                        .set((
                            user_data_uploads::status.eq(request.new_status),
                            user_data_uploads::error_message.eq(error_message),
                        ))
                        .get_result(tx)
                        .await
                        .map_err(|e| {
                            ServiceError::DatabaseError(format!("Failed to update status: {}", e))
                        })
                })
            })
            .await?;

        tracing::info!(
            upload_id = %upload_id,
            status = %updated.status.as_str(),
            "Upload status updated"
        );

        Ok(updated)
    }

    /// Write the aggregate counters produced by analysis. All four columns
    /// are overwritten with the request values, absent fields included, so
    /// identical requests are idempotent.
    #[instrument(skip(self, request))]
    pub async fn update_analysis_summaries(
        &self,
        upload_id: Uuid,
        request: UpdateSummariesRequest,
    ) -> Result<UserDataUpload, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        diesel::update(user_data_uploads::table.find(upload_id))
            .set((
                user_data_uploads::total_followers.eq(request.total_followers),
                user_data_uploads::total_following.eq(request.total_following),
                user_data_uploads::unfollowers_count.eq(request.unfollowers_count),
                user_data_uploads::total_close_friends.eq(request.total_close_friends),
            ))
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to update summaries: {}", e)))?
            .ok_or(ServiceError::NotFound)
    }

    /// Delete an upload and everything derived from it. Removing an upload
    /// that is already gone is a no-op, so retried deletes succeed.
    #[instrument(skip(self))]
    pub async fn delete_upload(&self, upload_id: Uuid) -> Result<(), ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        let deleted = conn
            .transaction::<usize, ServiceError, _>(|tx| {
                Box::pin(async move {
                    diesel::delete(
                        analysis_results::table
                            .filter(analysis_results::upload_id.eq(upload_id)),
                    )
                    .execute(tx)
                    .await
                    .map_err(|e| {
                        ServiceError::DatabaseError(format!("Failed to delete results: {}", e))
                    })?;

                    diesel::delete(user_data_uploads::table.find(upload_id))
                        .execute(tx)
                        .await
                        .map_err(|e| {
                            ServiceError::DatabaseError(format!("Failed to delete upload: {}", e))
                        })
                })
            })
            .await?;

        if deleted > 0 {
            tracing::info!(upload_id = %upload_id, "Upload deleted");
        }

        Ok(())
    }
}
