// Database-backed coverage of the analysis result store: nothing persists
// for a missing upload, overwrites keep the original created_at, and the
// lookup queries stay deterministic.

mod common;

use gramlytics_backend_core::models::{AnalysisDataType, SaveAnalysisResultRequest};
use gramlytics_backend_core::services::AnalysisResultService;
use gramlytics_backend_core::utils::ServiceError;
use uuid::Uuid;

fn save_request(upload_id: Uuid, target: &str) -> SaveAnalysisResultRequest {
    SaveAnalysisResultRequest {
        id: None,
        upload_id,
        data_type: AnalysisDataType::Unfollower,
        target_identifier: target.to_string(),
        value_numeric: None,
        value_text: None,
        meta_json: None,
    }
}

#[tokio::test]
async fn save_against_missing_upload_persists_nothing() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let service = AnalysisResultService::new(pool);

    let orphan_id = Uuid::new_v4();
    let err = service
        .save_result(SaveAnalysisResultRequest {
            id: Some(orphan_id),
            ..save_request(Uuid::new_v4(), "alice")
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    // The failed save left no row behind
    assert!(matches!(
        service.get_result(orphan_id).await,
        Err(ServiceError::NotFound)
    ));
}

#[tokio::test]
async fn overwrite_keeps_created_at_and_updates_payload() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let user = common::create_test_user(&pool).await;
    let upload = common::create_test_upload(&pool, user.id).await;
    let service = AnalysisResultService::new(pool.clone());

    let first = service
        .save_result(SaveAnalysisResultRequest {
            value_numeric: Some(1),
            ..save_request(upload.id, "alice")
        })
        .await
        .unwrap();

    let second = service
        .save_result(SaveAnalysisResultRequest {
            id: Some(first.id),
            value_numeric: Some(2),
            value_text: Some("unfollowed last week".to_string()),
            ..save_request(upload.id, "alice")
        })
        .await
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.value_numeric, Some(2));
    assert_eq!(second.value_text.as_deref(), Some("unfollowed last week"));

    // Still exactly one row for the upload
    assert_eq!(service.list_by_upload(upload.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_queries_filter_and_order_by_insertion() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let user = common::create_test_user(&pool).await;
    let upload = common::create_test_upload(&pool, user.id).await;
    let service = AnalysisResultService::new(pool.clone());

    let unfollower = service
        .save_result(save_request(upload.id, "alice"))
        .await
        .unwrap();
    let close_friend = service
        .save_result(SaveAnalysisResultRequest {
            data_type: AnalysisDataType::CloseFriendItem,
            ..save_request(upload.id, "bob")
        })
        .await
        .unwrap();

    let all = service.list_by_upload(upload.id).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, unfollower.id);
    assert_eq!(all[1].id, close_friend.id);

    let filtered = service
        .list_by_upload_and_type(upload.id, AnalysisDataType::CloseFriendItem)
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, close_friend.id);
}

#[tokio::test]
async fn find_one_is_deterministic_for_duplicates() {
    let Some(pool) = common::setup_pool().await else {
        return;
    };
    let user = common::create_test_user(&pool).await;
    let upload = common::create_test_upload(&pool, user.id).await;
    let service = AnalysisResultService::new(pool.clone());

    // Duplicates on the (upload, type, target) triple are permitted
    service
        .save_result(save_request(upload.id, "alice"))
        .await
        .unwrap();
    service
        .save_result(save_request(upload.id, "alice"))
        .await
        .unwrap();

    let listed = service
        .list_by_upload_and_type(upload.id, AnalysisDataType::Unfollower)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);

    let found = service
        .find_one(upload.id, AnalysisDataType::Unfollower, "alice")
        .await
        .unwrap()
        .expect("expected a match");

    // The answer is the head of the same ordering the list query uses,
    // and it does not change across repeated calls
    assert_eq!(found.id, listed[0].id);
    let again = service
        .find_one(upload.id, AnalysisDataType::Unfollower, "alice")
        .await
        .unwrap()
        .expect("expected a match");
    assert_eq!(again.id, found.id);

    let miss = service
        .find_one(upload.id, AnalysisDataType::Unfollower, "nobody")
        .await
        .unwrap();
    assert!(miss.is_none());
}
