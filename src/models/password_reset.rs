// Password reset token model. Only the SHA-256 digest of the opaque token is
// persisted; the plaintext token exists once, in the response to the request
// that minted it.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::schema::password_resets;

/// Password reset row
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = password_resets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PasswordReset {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl PasswordReset {
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// New password reset for insertion
#[derive(Debug, Insertable)]
#[diesel(table_name = password_resets)]
pub struct NewPasswordReset {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
}

impl NewPasswordReset {
    pub fn new(user_id: Uuid, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            expires_at,
            used: false,
        }
    }
}

/// Request to start a password reset flow
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RequestPasswordResetRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Request to complete a password reset with the token from the email link
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ConfirmPasswordResetRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_reset_starts_unused() {
        let reset = NewPasswordReset::new(
            Uuid::new_v4(),
            "digest".to_string(),
            Utc::now() + Duration::minutes(30),
        );
        assert!(!reset.used);
    }

    #[test]
    fn test_expiry_check() {
        let expired = PasswordReset {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "digest".to_string(),
            expires_at: Utc::now() - Duration::minutes(1),
            used: false,
            created_at: Utc::now() - Duration::minutes(31),
        };
        assert!(expired.is_expired());
    }
}
