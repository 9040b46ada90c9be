// Centralized configuration management
// Load ALL env vars ONCE at startup

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Global application configuration loaded once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    // For tests, load .env file first
    #[cfg(test)]
    dotenv::dotenv().ok();

    AppConfig::from_env().expect("Failed to load configuration")
});

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    // Server
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,
    pub rust_log: String,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_connect_timeout: u64,
    pub database_idle_timeout: u64,
    pub database_max_lifetime: u64,

    // Security
    pub bcrypt_cost: u32,
    pub cors_allowed_origins: Vec<String>,

    // Features
    pub disable_embedded_migrations: bool,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_address: get_var_or("BIND_ADDRESS", "0.0.0.0"),
            port: get_parsed_or("PORT", 8080)?,
            environment: Environment::from(get_var_or("ENVIRONMENT", "development")),
            rust_log: get_var_or("RUST_LOG", "gramlytics_backend_core=debug,tower_http=info"),

            database_url: get_var("DATABASE_URL")?,
            database_max_connections: get_parsed_or("DATABASE_MAX_CONNECTIONS", 10)?,
            database_min_connections: get_parsed_or("DATABASE_MIN_CONNECTIONS", 1)?,
            database_connect_timeout: get_parsed_or("DATABASE_CONNECT_TIMEOUT", 30)?,
            database_idle_timeout: get_parsed_or("DATABASE_IDLE_TIMEOUT", 600)?,
            database_max_lifetime: get_parsed_or("DATABASE_MAX_LIFETIME", 1800)?,

            bcrypt_cost: get_parsed_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            cors_allowed_origins: get_var_or("CORS_ALLOWED_ORIGINS", "*")
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),

            disable_embedded_migrations: get_parsed_or("DISABLE_EMBEDDED_MIGRATIONS", false)?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// Accessor for the global config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

fn get_var(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}

fn get_var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_parsed_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(
            Environment::from("production".to_string()),
            Environment::Production
        );
        assert_eq!(Environment::from("dev".to_string()), Environment::Development);
        assert_eq!(
            Environment::from("unknown".to_string()),
            Environment::Development
        );
    }

    #[test]
    fn test_environment_display() {
        assert_eq!(Environment::Staging.to_string(), "staging");
    }
}
