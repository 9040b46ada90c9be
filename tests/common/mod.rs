// Common helpers for database-backed integration tests.
// Tests skip cleanly when no database is configured, so the suite can run
// in environments without Postgres.

use gramlytics_backend_core::db::{create_diesel_pool, DieselDatabaseConfig, DieselPool};
use gramlytics_backend_core::models::{
    CreateUploadRequest, CreateUserRequest, DeclaredFileType, User, UserDataUpload,
};
use gramlytics_backend_core::services::{UploadService, UserService};
use uuid::Uuid;

/// Build a pool against DATABASE_URL with migrations applied, or None when
/// the environment has no database.
pub async fn setup_pool() -> Option<DieselPool> {
    dotenv::dotenv().ok();

    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return None;
    }

    let pool = match create_diesel_pool(DieselDatabaseConfig::default()).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Skipping test: failed to create pool: {}", e);
            return None;
        },
    };

    if let Err(e) = gramlytics_backend_core::migrations::run_migrations().await {
        eprintln!("Skipping test: migrations failed: {}", e);
        return None;
    }

    Some(pool)
}

/// Unique email per test run so the users table uniqueness never collides.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

pub async fn create_test_user(pool: &DieselPool) -> User {
    UserService::new(pool.clone())
        .create_user(CreateUserRequest {
            email: unique_email("it"),
            password: "correct-horse-battery".to_string(),
        })
        .await
        .expect("failed to create test user")
}

pub async fn create_test_upload(pool: &DieselPool, user_id: Uuid) -> UserDataUpload {
    UploadService::new(pool.clone())
        .create_upload(CreateUploadRequest {
            user_id,
            file_name: "instagram_export.zip".to_string(),
            file_path: format!("/data/uploads/{}/instagram_export.zip", user_id),
            declared_file_type: DeclaredFileType::Followers,
        })
        .await
        .expect("failed to create test upload")
}
