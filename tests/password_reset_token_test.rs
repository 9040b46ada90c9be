// Reset token properties that hold without a database.

use gramlytics_backend_core::models::password_reset::{
    ConfirmPasswordResetRequest, NewPasswordReset, RequestPasswordResetRequest,
};
use gramlytics_backend_core::services::PasswordResetService;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

#[test]
fn token_is_urlsafe_and_digest_matches() {
    let info = PasswordResetService::generate_reset_token();

    // base64url alphabet only, no padding
    assert!(info
        .token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    assert!(!info.token.ends_with('='));

    // 64 hex chars of SHA-256
    assert_eq!(info.token_hash.len(), 64);
    assert!(info.token_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn expiry_is_about_thirty_minutes_out() {
    let info = PasswordResetService::generate_reset_token();
    let ttl = info.expires_at - Utc::now();

    assert!(ttl.num_minutes() >= 29);
    assert!(ttl.num_minutes() <= 30);
}

#[test]
fn two_tokens_never_collide() {
    let a = PasswordResetService::generate_reset_token();
    let b = PasswordResetService::generate_reset_token();

    assert_ne!(a.token, b.token);
    assert_ne!(a.token_hash, b.token_hash);
}

#[test]
fn new_reset_row_is_unused() {
    let info = PasswordResetService::generate_reset_token();
    let row = NewPasswordReset::new(Uuid::new_v4(), info.token_hash, info.expires_at);

    assert!(!row.used);
}

#[test]
fn request_validation() {
    let bad = RequestPasswordResetRequest {
        email: "not-an-email".to_string(),
    };
    assert!(bad.validate().is_err());

    let ok = RequestPasswordResetRequest {
        email: "user@example.com".to_string(),
    };
    assert!(ok.validate().is_ok());

    let weak = ConfirmPasswordResetRequest {
        token: "abc".to_string(),
        new_password: "short".to_string(),
    };
    assert!(weak.validate().is_err());

    let strong = ConfirmPasswordResetRequest {
        token: "abc".to_string(),
        new_password: "a-much-longer-password".to_string(),
    };
    assert!(strong.validate().is_ok());
}
