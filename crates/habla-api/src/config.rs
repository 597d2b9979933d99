use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use thiserror::Error;

const MIN_PRODUCTION_SECRET_LEN: usize = 32;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Env(#[from] envy::Error),
    #[error("JWT_SECRET must be at least 32 bytes in production")]
    WeakJwtSecret,
    #[error("SESSION_IDLE_MINUTES must be greater than zero")]
    ZeroSessionIdle,
}

/// Server configuration, read from environment variables.
///
/// | Variable | Default |
/// |---|---|
/// | `ENV` | `development` |
/// | `PORT` | `3000` |
/// | `JWT_SECRET` | required |
/// | `ALLOWED_ORIGINS` | `http://localhost:3001` |
/// | `LESSONS_PATH` | built-in seed lessons |
/// | `SESSION_IDLE_MINUTES` | `120` |
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Secret shared with the identity provider that signs bearer tokens.
    pub jwt_secret: String,
    /// Comma separated list of origins allowed by CORS.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
    /// JSON file holding the lesson catalogue.
    #[serde(default)]
    pub lessons_path: Option<PathBuf>,
    /// Practice sessions untouched for this long are swept.
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: u64,
}

fn default_port() -> u16 {
    3000
}

fn default_allowed_origins() -> String {
    "http://localhost:3001".to_string()
}

const fn default_session_idle_minutes() -> u64 {
    120
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::from_iter(vars)?;
        config.validate()?;
        Ok(config)
    }

    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub const fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_minutes.saturating_mul(60))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.env.is_production() && self.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(ConfigError::WeakJwtSecret);
        }
        if self.session_idle_minutes == 0 {
            return Err(ConfigError::ZeroSessionIdle);
        }
        Ok(())
    }
}
