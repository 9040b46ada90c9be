// Password reset flow. Tokens are 32 random bytes, base64url on the wire and
// SHA-256 in the database. Requesting a reset for an unknown email returns
// None so the HTTP layer can answer identically either way.

use base64::prelude::*;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_config::config,
    db::DieselPool,
    models::{NewPasswordReset, PasswordReset, User},
    schema::{password_resets, users},
    utils::ServiceError,
};

/// Reset tokens are valid for 30 minutes.
const TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Clone)]
pub struct PasswordResetService {
    pool: DieselPool,
}

#[derive(Debug)]
pub struct ResetTokenInfo {
    pub token: String,      // Raw token, sent to the user and never stored
    pub token_hash: String, // SHA-256 digest stored in the database
    pub expires_at: DateTime<Utc>,
}

impl PasswordResetService {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    /// Generate a fresh reset token with 256 bits of entropy.
    pub fn generate_reset_token() -> ResetTokenInfo {
        let mut token_bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut token_bytes);

        let token = BASE64_URL_SAFE_NO_PAD.encode(token_bytes);
        let token_hash = Self::hash_token(&token);
        let expires_at = Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES);

        ResetTokenInfo {
            token,
            token_hash,
            expires_at,
        }
    }

    fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Start a reset flow for the given email. Any live token the user still
    /// holds is retired first so at most one token is valid at a time.
    #[instrument(skip(self, email))]
    pub async fn create_reset_request(
        &self,
        email: &str,
    ) -> Result<Option<ResetTokenInfo>, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        let user: Option<User> = users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to load user: {}", e)))?;

        let user = match user {
            Some(user) => user,
            None => {
                tracing::info!("Password reset requested for unknown email");
                return Ok(None);
            },
        };

        let token_info = Self::generate_reset_token();
        let new_reset =
            NewPasswordReset::new(user.id, token_info.token_hash.clone(), token_info.expires_at);

        conn.transaction::<(), ServiceError, _>(|tx| {
            Box::pin(async move {
                diesel::update(
                    password_resets::table
                        .filter(password_resets::user_id.eq(new_reset.user_id))
                        .filter(password_resets::used.eq(false)),
                )
                .set(password_resets::used.eq(true))
                .execute(tx)
                .await
                .map_err(|e| {
                    ServiceError::DatabaseError(format!("Failed to retire old tokens: {}", e))
                })?;

                diesel::insert_into(password_resets::table)
                    .values(&new_reset)
                    .execute(tx)
                    .await
                    .map_err(|e| {
                        ServiceError::DatabaseError(format!("Failed to create reset token: {}", e))
                    })?;

                Ok(())
            })
        })
        .await?;

        tracing::info!(user_id = %user.id, "Password reset token created");

        Ok(Some(token_info))
    }

    /// Check a raw token without consuming it.
    pub async fn validate_token(&self, token: &str) -> Result<Uuid, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        let reset = Self::find_live_token(&mut conn, token).await?;
        Ok(reset.user_id)
    }

    /// Consume a token and set the user's new password, all in one
    /// transaction. A second consume of the same token fails.
    #[instrument(skip(self, token, new_password))]
    pub async fn consume_token(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<Uuid, ServiceError> {
        let password_hash = bcrypt::hash(new_password, config().bcrypt_cost)
            .map_err(|e| ServiceError::InternalError(format!("Password hashing failed: {}", e)))?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        let token = token.to_string();
        let user_id = conn
            .transaction::<Uuid, ServiceError, _>(|tx| {
                Box::pin(async move {
                    let reset = Self::find_live_token(tx, &token).await?;

                    let claimed = diesel::update(
                        password_resets::table
                            .find(reset.id)
                            .filter(password_resets::used.eq(false)),
                    )
                    .set(password_resets::used.eq(true))
                    .execute(tx)
                    .await
                    .map_err(|e| {
                        ServiceError::DatabaseError(format!("Failed to consume token: {}", e))
                    })?;

                    // Lost the race against a concurrent consume
                    if claimed == 0 {
                        return Err(ServiceError::ValidationError(
                            "Reset token is invalid or expired".to_string(),
                        ));
                    }

                    diesel::update(users::table.find(reset.user_id))
                        .set((
                            users::password_hash.eq(password_hash),
                            users::updated_at.eq(diesel::dsl::now),
                        ))
                        .execute(tx)
                        .await
                        .map_err(|e| {
                            ServiceError::DatabaseError(format!("Failed to set password: {}", e))
                        })?;

                    Ok(reset.user_id)
                })
            })
            .await?;

        tracing::info!(user_id = %user_id, "Password reset completed");

        Ok(user_id)
    }

    async fn find_live_token(
        conn: &mut diesel_async::AsyncPgConnection,
        token: &str,
    ) -> Result<PasswordReset, ServiceError> {
        let token_hash = Self::hash_token(token);

        password_resets::table
            .filter(password_resets::token_hash.eq(token_hash))
            .filter(password_resets::used.eq(false))
            .filter(password_resets::expires_at.gt(Utc::now()))
            .first(conn)
            .await
            .optional()
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to look up token: {}", e)))?
            .ok_or_else(|| {
                ServiceError::ValidationError("Reset token is invalid or expired".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_shape() {
        let info = PasswordResetService::generate_reset_token();

        // 32 bytes of base64url without padding is 43 characters
        assert_eq!(info.token.len(), 43);
        // SHA-256 hex digest
        assert_eq!(info.token_hash.len(), 64);
        assert!(info.expires_at > Utc::now());
    }

    #[test]
    fn test_token_hash_matches_token() {
        let info = PasswordResetService::generate_reset_token();
        assert_eq!(PasswordResetService::hash_token(&info.token), info.token_hash);
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = PasswordResetService::generate_reset_token();
        let b = PasswordResetService::generate_reset_token();
        assert_ne!(a.token, b.token);
    }
}
