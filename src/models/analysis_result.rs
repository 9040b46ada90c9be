// Analysis result model: one derived fact about an upload, typed by data
// type. Rows are written by the external analysis process and read-only
// afterwards; they live and die with their parent upload.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::schema::analysis_results;

// =============================================================================
// ENUMS
// =============================================================================

/// Type of data represented by an analysis result entry.
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
pub enum AnalysisDataType {
    Unfollower,
    CloseFriendItem,
    MessageThreadSummary,
    LikedMediaItem,
    CommentItem,
}

impl AnalysisDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisDataType::Unfollower => "UNFOLLOWER",
            AnalysisDataType::CloseFriendItem => "CLOSE_FRIEND_ITEM",
            AnalysisDataType::MessageThreadSummary => "MESSAGE_THREAD_SUMMARY",
            AnalysisDataType::LikedMediaItem => "LIKED_MEDIA_ITEM",
            AnalysisDataType::CommentItem => "COMMENT_ITEM",
        }
    }
}

impl FromStr for AnalysisDataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNFOLLOWER" => Ok(AnalysisDataType::Unfollower),
            "CLOSE_FRIEND_ITEM" => Ok(AnalysisDataType::CloseFriendItem),
            "MESSAGE_THREAD_SUMMARY" => Ok(AnalysisDataType::MessageThreadSummary),
            "LIKED_MEDIA_ITEM" => Ok(AnalysisDataType::LikedMediaItem),
            "COMMENT_ITEM" => Ok(AnalysisDataType::CommentItem),
            _ => Err(format!("Invalid analysis data type: {}", s)),
        }
    }
}

impl<DB> diesel::deserialize::FromSql<diesel::sql_types::Text, DB> for AnalysisDataType
where
    DB: diesel::backend::Backend,
    String: diesel::deserialize::FromSql<diesel::sql_types::Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> diesel::deserialize::Result<Self> {
        let value = String::from_sql(bytes)?;
        Self::from_str(&value).map_err(|e| e.into())
    }
}

impl<DB> diesel::serialize::ToSql<diesel::sql_types::Text, DB> for AnalysisDataType
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

/// Analysis result row
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = analysis_results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AnalysisResult {
    pub id: Uuid,
    pub upload_id: Uuid,
    pub data_type: AnalysisDataType,
    pub target_identifier: String,
    pub value_numeric: Option<i64>,
    pub value_text: Option<String>,
    /// Structured payload whose shape is defined by data_type; opaque here.
    pub meta_json: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// New analysis result for insertion. On the upsert path created_at is kept
/// from the existing row; only the payload columns are rewritten.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = analysis_results)]
pub struct NewAnalysisResult {
    pub id: Uuid,
    pub upload_id: Uuid,
    pub data_type: AnalysisDataType,
    pub target_identifier: String,
    pub value_numeric: Option<i64>,
    pub value_text: Option<String>,
    pub meta_json: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// REQUEST/RESPONSE DTOs
// =============================================================================

/// Request to persist an analysis result. Supplying an existing id overwrites
/// that row; omitting it creates a new one.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "upload_id": "123e4567-e89b-12d3-a456-426614174000",
    "data_type": "UNFOLLOWER",
    "target_identifier": "alice",
    "value_numeric": null,
    "value_text": null,
    "meta_json": {"followed_back": false}
}))]
pub struct SaveAnalysisResultRequest {
    pub id: Option<Uuid>,

    pub upload_id: Uuid,

    pub data_type: AnalysisDataType,

    #[validate(length(min = 1, max = 255, message = "Target identifier cannot be empty"))]
    pub target_identifier: String,

    pub value_numeric: Option<i64>,

    pub value_text: Option<String>,

    pub meta_json: Option<serde_json::Value>,
}

/// Analysis result response for API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalysisResultResponse {
    pub id: Uuid,
    pub upload_id: Uuid,
    pub data_type: AnalysisDataType,
    pub target_identifier: String,
    pub value_numeric: Option<i64>,
    pub value_text: Option<String>,
    pub meta_json: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<AnalysisResult> for AnalysisResultResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            id: result.id,
            upload_id: result.upload_id,
            data_type: result.data_type,
            target_identifier: result.target_identifier,
            value_numeric: result.value_numeric,
            value_text: result.value_text,
            meta_json: result.meta_json,
            created_at: result.created_at,
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
    fn test_data_type_round_trip() {
        for data_type in [
            AnalysisDataType::Unfollower,
            AnalysisDataType::CloseFriendItem,
            AnalysisDataType::MessageThreadSummary,
            AnalysisDataType::LikedMediaItem,
            AnalysisDataType::CommentItem,
        ] {
            assert_eq!(AnalysisDataType::from_str(data_type.as_str()), Ok(data_type));
        }
        assert!(AnalysisDataType::from_str("unfollower").is_err());
    }

    #[test]
    fn test_serde_uses_symbolic_names() {
        let json = serde_json::to_string(&AnalysisDataType::MessageThreadSummary).unwrap();
        assert_eq!(json, "\"MESSAGE_THREAD_SUMMARY\"");

        let parsed: AnalysisDataType = serde_json::from_str("\"CLOSE_FRIEND_ITEM\"").unwrap();
        assert_eq!(parsed, AnalysisDataType::CloseFriendItem);
    }

    #[test]
    fn test_save_request_rejects_blank_target() {
        let request = SaveAnalysisResultRequest {
            id: None,
            upload_id: Uuid::new_v4(),
            data_type: AnalysisDataType::Unfollower,
            target_identifier: "".to_string(),
            value_numeric: None,
            value_text: None,
            meta_json: None,
        };
        assert!(request.validate().is_err());
    }
}
