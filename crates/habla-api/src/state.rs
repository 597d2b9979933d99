use std::time::Duration;

use axum::extract::FromRef;

use crate::{
    ApiConfig,
    auth::AuthContext,
    config::Environment,
    lesson::{LessonStore, model::seed_lessons},
    practice::{ProgressStore, SessionStore},
};

#[derive(Clone, Debug)]
pub struct ApiState {
    pub jwt_secret: String,
    pub environment: Environment,
    pub auth: AuthContext,
    pub lessons: LessonStore,
    pub sessions: SessionStore,
    pub progress: ProgressStore,
    /// How long a practice session may sit untouched before it is swept.
    pub session_idle_ttl: Duration,
}

impl ApiState {
    /// Build the state from configuration, loading lessons from
    /// `LESSONS_PATH` when set.
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let lessons = match &config.lessons_path {
            Some(path) => LessonStore::load(path)?,
            None => {
                tracing::warn!("LESSONS_PATH not set, serving built-in seed lessons");
                LessonStore::new(seed_lessons())
            }
        };

        Ok(Self::with_lessons(config, lessons))
    }

    pub fn with_lessons(config: &ApiConfig, lessons: LessonStore) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            environment: config.env.clone(),
            auth: AuthContext::new(),
            lessons,
            sessions: SessionStore::new(),
            progress: ProgressStore::new(),
            session_idle_ttl: config.session_idle_ttl(),
        }
    }
}

/// What the auth extractors need from the state.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub context: AuthContext,
}

impl FromRef<ApiState> for AuthConfig {
    fn from_ref(state: &ApiState) -> Self {
        Self {
            jwt_secret: state.jwt_secret.clone(),
            context: state.auth.clone(),
        }
    }
}
