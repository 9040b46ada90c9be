// Upload lifecycle model: one record per submitted data file, tracking the
// state of its analysis from submission through completion.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::schema::user_data_uploads;

// =============================================================================
// ENUMS
// =============================================================================

/// Current status of a data upload and its analysis.
///
/// `Pending` is the only creation-time status. `Completed`, `Failed` and
/// `InvalidFile` are terminal for a given analysis attempt; a terminal record
/// may be moved back to `Processing` when the analysis process re-runs it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    diesel::expression::AsExpression,
    diesel::FromSqlRow,
)]
#[diesel(sql_type = diesel::sql_types::Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    InvalidFile,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Pending => "PENDING",
            UploadStatus::Processing => "PROCESSING",
            UploadStatus::Completed => "COMPLETED",
            UploadStatus::Failed => "FAILED",
            UploadStatus::InvalidFile => "INVALID_FILE",
        }
    }

    /// Whether no further automatic transition is expected from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadStatus::Completed | UploadStatus::Failed | UploadStatus::InvalidFile
        )
    }

    /// Allowed status transitions.
    ///
    /// Same-status writes are accepted as no-ops. A terminal record may only
    /// move back to `Processing`, which is how the external analysis process
    /// re-runs an attempt. Everything else (e.g. COMPLETED back to PENDING)
    /// is rejected.
    pub fn can_transition_to(&self, next: UploadStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            UploadStatus::Pending => matches!(
                next,
                UploadStatus::Processing | UploadStatus::Failed | UploadStatus::InvalidFile
            ),
            UploadStatus::Processing => matches!(
                next,
                UploadStatus::Completed | UploadStatus::Failed | UploadStatus::InvalidFile
            ),
            UploadStatus::Completed | UploadStatus::Failed | UploadStatus::InvalidFile => {
                matches!(next, UploadStatus::Processing)
            },
        }
    }
}

impl FromStr for UploadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(UploadStatus::Pending),
            "PROCESSING" => Ok(UploadStatus::Processing),
            "COMPLETED" => Ok(UploadStatus::Completed),
            "FAILED" => Ok(UploadStatus::Failed),
            "INVALID_FILE" => Ok(UploadStatus::InvalidFile),
            _ => Err(format!("Invalid upload status: {}", s)),
        }
    }
}

impl<DB> diesel::deserialize::FromSql<diesel::sql_types::Text, DB> for UploadStatus
where
    DB: diesel::backend::Backend,
    String: diesel::deserialize::FromSql<diesel::sql_types::Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> diesel::deserialize::Result<Self> {
        let value = String::from_sql(bytes)?;
        Self::from_str(&value).map_err(|e| e.into())
    }
}

impl<DB> diesel::serialize::ToSql<diesel::sql_types::Text, DB> for UploadStatus
where
    DB: diesel::backend::Backend,
    str: diesel::serialize::ToSql<diesel::sql_types::Text, DB>,
{
    fn to_sql<'b>(
        &'b self,
        out: &mut diesel::serialize::Output<'b, '_, DB>,
    ) -> diesel::serialize::Result {
        self.as_str().to_sql(out)
    }
}

/// Type of data file declared by the caller at upload time.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    diesel::expression::AsExpression,
    diesel::FromSqlRow,
)]
#[diesel(sql_type = diesel::sql_types::Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeclaredFileType {
    Followers,
    CloseFriends,
    Messages,
    Unknown,
}

impl DeclaredFileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclaredFileType::Followers => "FOLLOWERS",
            DeclaredFileType::CloseFriends => "CLOSE_FRIENDS",
            DeclaredFileType::Messages => "MESSAGES",
            DeclaredFileType::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for DeclaredFileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FOLLOWERS" => Ok(DeclaredFileType::Followers),
            "CLOSE_FRIENDS" => Ok(DeclaredFileType::CloseFriends),
            "MESSAGES" => Ok(DeclaredFileType::Messages),
            "UNKNOWN" => Ok(DeclaredFileType::Unknown),
            _ => Err(format!("Invalid declared file type: {}", s)),
        }
    }
}

impl<DB> diesel::deserialize::FromSql<diesel::sql_types::Text, DB> for DeclaredFileType
where
    DB: diesel::backend::Backend,
    String: diesel::deserialize::FromSql<diesel::sql_types::Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> diesel::deserialize::Result<Self> {
        let value = String::from_sql(bytes)?;
        Self::from_str(&value).map_err(|e| e.into())
    }
}

impl<DB> diesel::serialize::ToSql<diesel::sql_types::Text, DB> for DeclaredFileType
where
    DB: diesel::backend::Backend,
    str: diesel::serialize::ToSql<diesel::sql_types::Text, DB>,
{
    fn to_sql<'b>(
        &'b self,
        out: &mut diesel::serialize::Output<'b, '_, DB>,
    ) -> diesel::serialize::Result {
        self.as_str().to_sql(out)
    }
}

// =============================================================================
// DATABASE MODELS
// =============================================================================

/// Upload record representing a database row
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = user_data_uploads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserDataUpload {
    pub id: Uuid,
    pub user_id: Uuid,
    pub upload_time: DateTime<Utc>,
    pub file_name: String,
    pub file_path: String,
    pub declared_file_type: DeclaredFileType,
    pub status: UploadStatus,
    pub error_message: Option<String>,
    pub total_followers: Option<i32>,
    pub total_following: Option<i32>,
    pub unfollowers_count: Option<i32>,
    pub total_close_friends: Option<i32>,
}

/// New upload for insertion. Status and upload_time are fixed at construction
/// so callers can never create a record in any state other than PENDING.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_data_uploads)]
pub struct NewUserDataUpload {
    pub id: Uuid,
    pub user_id: Uuid,
    pub upload_time: DateTime<Utc>,
    pub file_name: String,
    pub file_path: String,
    pub declared_file_type: DeclaredFileType,
    pub status: UploadStatus,
}

impl NewUserDataUpload {
    pub fn new(
        user_id: Uuid,
        file_name: String,
        file_path: String,
        declared_file_type: DeclaredFileType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            upload_time: Utc::now(),
            file_name,
            file_path,
            declared_file_type,
            status: UploadStatus::Pending,
        }
    }
}

// =============================================================================
// REQUEST/RESPONSE DTOs
// =============================================================================

/// Request to create a new upload record
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "user_id": "123e4567-e89b-12d3-a456-426614174000",
    "file_name": "instagram_export.zip",
    "file_path": "s3://uploads/123e4567/instagram_export.zip",
    "declared_file_type": "FOLLOWERS"
}))]
pub struct CreateUploadRequest {
    pub user_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "File name cannot be empty"))]
    pub file_name: String,

    #[validate(length(min = 1, max = 1024, message = "File path cannot be empty"))]
    pub file_path: String,

    pub declared_file_type: DeclaredFileType,
}

/// Request to update the status of an upload record
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "new_status": "FAILED",
    "error_message": "archive did not contain followers.json"
}))]
pub struct UpdateUploadStatusRequest {
    pub new_status: UploadStatus,

    /// Conventionally only set when new_status is FAILED or INVALID_FILE;
    /// the value is stored as provided either way.
    pub error_message: Option<String>,
}

/// Request to overwrite the post-analysis summary counters
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateSummariesRequest {
    pub total_followers: Option<i32>,
    pub total_following: Option<i32>,
    pub unfollowers_count: Option<i32>,
    pub total_close_friends: Option<i32>,
}

/// Upload response for API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub declared_file_type: DeclaredFileType,
    pub status: UploadStatus,
    pub error_message: Option<String>,
    pub total_followers: Option<i32>,
    pub total_following: Option<i32>,
    pub unfollowers_count: Option<i32>,
    pub total_close_friends: Option<i32>,
    pub upload_time: DateTime<Utc>,
}

impl From<UserDataUpload> for UploadResponse {
    fn from(upload: UserDataUpload) -> Self {
        Self {
            id: upload.id,
            user_id: upload.user_id,
            file_name: upload.file_name,
            file_path: upload.file_path,
            declared_file_type: upload.declared_file_type,
            status: upload.status,
            error_message: upload.error_message,
            total_followers: upload.total_followers,
            total_following: upload.total_following,
            unfollowers_count: upload.unfollowers_count,
            total_close_friends: upload.total_close_friends,
            upload_time: upload.upload_time,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_upload_defaults() {
        let upload = NewUserDataUpload::new(
            Uuid::new_v4(),
            "export.zip".to_string(),
            "s3://bucket/export.zip".to_string(),
            DeclaredFileType::Followers,
        );
        assert_eq!(upload.status, UploadStatus::Pending);
        assert!(upload.upload_time <= Utc::now());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            UploadStatus::Pending,
            UploadStatus::Processing,
            UploadStatus::Completed,
            UploadStatus::Failed,
            UploadStatus::InvalidFile,
        ] {
            assert_eq!(UploadStatus::from_str(status.as_str()), Ok(status));
        }
        assert!(UploadStatus::from_str("DONE").is_err());
    }

    #[test]
    fn test_file_type_round_trip() {
        for file_type in [
            DeclaredFileType::Followers,
            DeclaredFileType::CloseFriends,
            DeclaredFileType::Messages,
            DeclaredFileType::Unknown,
        ] {
            assert_eq!(DeclaredFileType::from_str(file_type.as_str()), Ok(file_type));
        }
    }

    #[test]
    fn test_serde_uses_symbolic_names() {
        let json = serde_json::to_string(&UploadStatus::InvalidFile).unwrap();
        assert_eq!(json, "\"INVALID_FILE\"");
        let json = serde_json::to_string(&DeclaredFileType::CloseFriends).unwrap();
        assert_eq!(json, "\"CLOSE_FRIENDS\"");
    }

    #[test]
    fn test_allowed_transitions() {
        use UploadStatus::*;

        assert!(Pending.can_transition_to(Processing));
        assert!(Pending.can_transition_to(InvalidFile));
        assert!(Pending.can_transition_to(Failed));
        assert!(Processing.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Failed));
        assert!(Processing.can_transition_to(InvalidFile));

        // Re-running a finished attempt
        assert!(Completed.can_transition_to(Processing));
        assert!(Failed.can_transition_to(Processing));
        assert!(InvalidFile.can_transition_to(Processing));

        // Idempotent writes
        for status in [Pending, Processing, Completed, Failed, InvalidFile] {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn test_rejected_transitions() {
        use UploadStatus::*;

        assert!(!Completed.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Completed));
        assert!(!Processing.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!InvalidFile.can_transition_to(Completed));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!UploadStatus::Pending.is_terminal());
        assert!(!UploadStatus::Processing.is_terminal());
        assert!(UploadStatus::Completed.is_terminal());
        assert!(UploadStatus::Failed.is_terminal());
        assert!(UploadStatus::InvalidFile.is_terminal());
    }
}
