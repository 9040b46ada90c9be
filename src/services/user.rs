// User account service. Passwords are bcrypt-hashed at the configured cost;
// a duplicate email surfaces as a conflict rather than a bare database error.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_config::config,
    db::DieselPool,
    models::{CreateUserRequest, NewUser, UpdateUserRequest, User},
    schema::users,
    utils::ServiceError,
};

#[derive(Clone)]
pub struct UserService {
    pool: DieselPool,
}

impl UserService {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, request))]
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, ServiceError> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        let password_hash = bcrypt::hash(&request.password, config().bcrypt_cost)
            .map_err(|e| ServiceError::InternalError(format!("Password hashing failed: {}", e)))?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        let user: User = diesel::insert_into(users::table)
            .values(NewUser::new(email, password_hash))
            .get_result(&mut conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => ServiceError::Conflict("Email is already registered".to_string()),
                other => ServiceError::DatabaseError(format!("Failed to create user: {}", other)),
            })?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        users::table
            .find(user_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to load user: {}", e)))?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to load user: {}", e)))
    }

    /// All users, oldest first. Admin surface; no pagination yet.
    pub async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        users::table
            .order(users::created_at.asc())
            .load(&mut conn)
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to list users: {}", e)))
    }

    /// Delete a user; uploads, results, subscription and reset tokens go
    /// with it through the FK cascade. Deleting an absent user is a no-op.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        let deleted = diesel::delete(users::table.find(user_id))
            .execute(&mut conn)
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Failed to delete user: {}", e)))?;

        if deleted > 0 {
            tracing::info!(user_id = %user_id, "User deleted");
        }

        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn update_user(
        &self,
        user_id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<User, ServiceError> {
        request.validate()?;

        let current = self.get_user(user_id).await?;

        let email = match request.email {
            Some(email) => email.trim().to_lowercase(),
            None => current.email,
        };
        let is_premium = request.is_premium.unwrap_or(current.is_premium);

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(format!("Database connection failed: {}", e)))?;

        diesel::update(users::table.find(user_id))
            .set((
                users::email.eq(email),
                users::is_premium.eq(is_premium),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .get_result(&mut conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => ServiceError::Conflict("Email is already registered".to_string()),
                other => ServiceError::DatabaseError(format!("Failed to update user: {}", other)),
            })
    }
}
