//! Server Configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).

use std::net::SocketAddr;

use auth::AuthConfig;
use platform::config::{ConfigError, env_flag, env_or, env_parse, env_string};
use platform::password::{
    DEFAULT_MIN_CHARACTER_CLASSES, MIN_PASSWORD_LENGTH, PasswordPolicy, PasswordRule,
};

const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub addr: SocketAddr,
    /// `None` runs on the in-memory store
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env_parse("API_ADDR", SocketAddr::from(([0, 0, 0, 0], 31113)))?;

        let frontend_origins = env_or("FRONTEND_ORIGINS", DEFAULT_FRONTEND_ORIGINS)
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let policy = PasswordPolicy::default()
            .with_rule(PasswordRule::MinLength(env_parse(
                "AUTH_PASSWORD_MIN_LENGTH",
                MIN_PASSWORD_LENGTH,
            )?))
            .with_rule(PasswordRule::Complexity {
                min_classes: env_parse("AUTH_PASSWORD_MIN_CLASSES", DEFAULT_MIN_CHARACTER_CLASSES)?,
            })
            .with_breach_check(env_flag("AUTH_PASSWORD_BREACH_CHECK", false)?);

        let mut auth = AuthConfig::default().with_password_policy(policy);
        if let Some(pepper) = env_string("AUTH_PASSWORD_PEPPER") {
            auth = auth.with_pepper(pepper);
        }

        Ok(Self {
            addr,
            database_url: env_string("DATABASE_URL"),
            database_max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 5)?,
            frontend_origins,
            auth,
        })
    }
}
