use serde::Deserialize;
use std::env;
use thiserror::Error;

/// Configuration loading or validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required but not set")]
    MissingEnv(String),

    #[error("{0} is required in production but not set")]
    MissingProdEnv(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub environment: Environment,
    pub jwt: JwtConfig,
    pub tokens: TokenExpiryConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret_key: String,
    pub access_token_expiry_minutes: i64,
    pub refresh_token_expiry_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenExpiryConfig {
    pub reset_token_expiry_hours: i64,
    pub invite_expiry_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str.parse().map_err(ConfigError::Validation)?;

        let is_prod = environment == Environment::Prod;

        let config = AuthConfig {
            environment,
            jwt: JwtConfig {
                // The signing secret has no default in any environment.
                secret_key: get_env("JWT_SECRET_KEY", None, is_prod)?,
                access_token_expiry_minutes: parse_env(
                    "JWT_ACCESS_TOKEN_EXPIRY_MINUTES",
                    Some("15"),
                    is_prod,
                )?,
                refresh_token_expiry_days: parse_env(
                    "JWT_REFRESH_TOKEN_EXPIRY_DAYS",
                    Some("7"),
                    is_prod,
                )?,
            },
            tokens: TokenExpiryConfig {
                reset_token_expiry_hours: parse_env(
                    "RESET_TOKEN_EXPIRY_HOURS",
                    Some("1"),
                    is_prod,
                )?,
                invite_expiry_days: parse_env("INVITE_EXPIRY_DAYS", Some("7"), is_prod)?,
            },
            database: DatabaseConfig {
                url: get_env("DATABASE_URL", None, is_prod)?,
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", Some("10"), is_prod)?,
                min_connections: parse_env("DATABASE_MIN_CONNECTIONS", Some("2"), is_prod)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Fail fast on configurations that would weaken the token scheme.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret_key.len() < 32 {
            return Err(ConfigError::Validation(
                "JWT_SECRET_KEY must be at least 32 bytes".to_string(),
            ));
        }

        if self.jwt.access_token_expiry_minutes <= 0 {
            return Err(ConfigError::Validation(
                "JWT_ACCESS_TOKEN_EXPIRY_MINUTES must be positive".to_string(),
            ));
        }

        if self.jwt.refresh_token_expiry_days <= 0 {
            return Err(ConfigError::Validation(
                "JWT_REFRESH_TOKEN_EXPIRY_DAYS must be positive".to_string(),
            ));
        }

        if self.tokens.reset_token_expiry_hours <= 0 {
            return Err(ConfigError::Validation(
                "RESET_TOKEN_EXPIRY_HOURS must be positive".to_string(),
            ));
        }

        if self.tokens.invite_expiry_days <= 0 {
            return Err(ConfigError::Validation(
                "INVITE_EXPIRY_DAYS must be positive".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "DATABASE_MAX_CONNECTIONS must be greater than 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Validation(
                "DATABASE_MIN_CONNECTIONS must not exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(())
    }

    /// Fixed configuration for tests and embedding examples. Never reads
    /// the environment.
    pub fn for_tests() -> Self {
        AuthConfig {
            environment: Environment::Dev,
            jwt: JwtConfig {
                secret_key: "test-secret-key-at-least-32-bytes-long!".to_string(),
                access_token_expiry_minutes: 15,
                refresh_token_expiry_days: 7,
            },
            tokens: TokenExpiryConfig {
                reset_token_expiry_hours: 1,
                invite_expiry_days: 7,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/auth_core_test".to_string(),
                max_connections: 5,
                min_connections: 1,
            },
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(ConfigError::MissingProdEnv(key.to_string()))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(ConfigError::MissingEnv(key.to_string()))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: Option<&str>, is_prod: bool) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env(key, default, is_prod)?
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue(key.to_string(), e.to_string()))
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
