// Upload lifecycle rules that hold without a database: the status machine,
// constructor-time defaults, and request validation.

use gramlytics_backend_core::models::upload::{
    CreateUploadRequest, DeclaredFileType, NewUserDataUpload, UploadStatus,
};
use uuid::Uuid;
use validator::Validate;

#[test]
fn new_upload_always_starts_pending() {
    let owner = Uuid::new_v4();
    let upload = NewUserDataUpload::new(
        owner,
        "followers_and_following.zip".to_string(),
        "/data/uploads/followers_and_following.zip".to_string(),
        DeclaredFileType::Followers,
    );

    assert_eq!(upload.status, UploadStatus::Pending);
    assert_eq!(upload.user_id, owner);
}

#[test]
fn pending_can_only_start_or_fail() {
    let from = UploadStatus::Pending;

    assert!(from.can_transition_to(UploadStatus::Processing));
    assert!(from.can_transition_to(UploadStatus::Failed));
    assert!(from.can_transition_to(UploadStatus::InvalidFile));
    assert!(!from.can_transition_to(UploadStatus::Completed));
}

#[test]
fn processing_can_finish_either_way() {
    let from = UploadStatus::Processing;

    assert!(from.can_transition_to(UploadStatus::Completed));
    assert!(from.can_transition_to(UploadStatus::Failed));
    assert!(from.can_transition_to(UploadStatus::InvalidFile));
    assert!(!from.can_transition_to(UploadStatus::Pending));
}

#[test]
fn terminal_states_only_reopen_into_processing() {
    for terminal in [
        UploadStatus::Completed,
        UploadStatus::Failed,
        UploadStatus::InvalidFile,
    ] {
        assert!(terminal.is_terminal());
        assert!(terminal.can_transition_to(UploadStatus::Processing));
        assert!(!terminal.can_transition_to(UploadStatus::Pending));
    }

    assert!(!UploadStatus::Completed.can_transition_to(UploadStatus::Failed));
    assert!(!UploadStatus::Failed.can_transition_to(UploadStatus::Completed));
    assert!(!UploadStatus::InvalidFile.can_transition_to(UploadStatus::Completed));
}

#[test]
fn same_status_write_is_always_allowed() {
    for status in [
        UploadStatus::Pending,
        UploadStatus::Processing,
        UploadStatus::Completed,
        UploadStatus::Failed,
        UploadStatus::InvalidFile,
    ] {
        assert!(status.can_transition_to(status));
    }
}

#[test]
fn create_request_rejects_blank_fields() {
    let blank_name = CreateUploadRequest {
        user_id: Uuid::new_v4(),
        file_name: "".to_string(),
        file_path: "/data/u/export.zip".to_string(),
        declared_file_type: DeclaredFileType::Followers,
    };
    assert!(blank_name.validate().is_err());

    let blank_path = CreateUploadRequest {
        user_id: Uuid::new_v4(),
        file_name: "export.zip".to_string(),
        file_path: "".to_string(),
        declared_file_type: DeclaredFileType::Followers,
    };
    assert!(blank_path.validate().is_err());

    let ok = CreateUploadRequest {
        user_id: Uuid::new_v4(),
        file_name: "export.zip".to_string(),
        file_path: "/data/u/export.zip".to_string(),
        declared_file_type: DeclaredFileType::Followers,
    };
    assert!(ok.validate().is_ok());
}

#[test]
fn status_serializes_as_symbolic_name() {
    assert_eq!(
        serde_json::to_string(&UploadStatus::InvalidFile).unwrap(),
        "\"INVALID_FILE\""
    );
    let parsed: UploadStatus = serde_json::from_str("\"PROCESSING\"").unwrap();
    assert_eq!(parsed, UploadStatus::Processing);
}
