use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use habla_grading::{Session, SessionState};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{error::ApiError, lesson::Lesson};

/// Sessions a user may hold at once. Starting another drops their least
/// recently used one.
pub const MAX_SESSIONS_PER_USER: usize = 16;

/// A grading [`Session`] owned by one user.
#[derive(Debug, Clone)]
pub struct LessonSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Bumped by every mutation. Idle sessions are swept by age of this stamp.
    pub last_active_at: DateTime<Utc>,
    pub session: Session,
}

/// What clients see of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub state: SessionState,
    pub position: usize,
    pub total: usize,
    pub score: usize,
    pub progress: f64,
    pub started_at: DateTime<Utc>,
}

impl From<&LessonSession> for SessionSnapshot {
    fn from(lesson_session: &LessonSession) -> Self {
        let session = &lesson_session.session;
        Self {
            id: lesson_session.id,
            lesson_id: lesson_session.lesson_id,
            state: session.state(),
            position: session.position(),
            total: session.len(),
            score: session.score(),
            progress: session.progress_percent(),
            started_at: lesson_session.started_at,
        }
    }
}

/// Live sessions, keyed by session id.
///
/// A user may only touch their own sessions; anything else is `Forbidden`.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, LessonSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn start(&self, user_id: Uuid, lesson: &Lesson) -> Result<SessionSnapshot, ApiError> {
        let session = Session::new(lesson.to_questions())?;
        let now = Utc::now();
        let lesson_session = LessonSession {
            id: Uuid::new_v4(),
            user_id,
            lesson_id: lesson.id,
            started_at: now,
            last_active_at: now,
            session,
        };
        let snapshot = SessionSnapshot::from(&lesson_session);

        let mut sessions = self.sessions.write().await;
        let owned: Vec<_> = sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .map(|s| (s.last_active_at, s.id))
            .collect();
        if owned.len() >= MAX_SESSIONS_PER_USER
            && let Some((_, oldest)) = owned.into_iter().min()
        {
            sessions.remove(&oldest);
            tracing::debug!(session_id = %oldest, %user_id, "Dropped least recently used session");
        }
        sessions.insert(lesson_session.id, lesson_session);
        drop(sessions);

        tracing::debug!(session_id = %snapshot.id, lesson_id = %lesson.id, %user_id, "Session started");
        Ok(snapshot)
    }

    pub async fn read<T>(
        &self,
        id: Uuid,
        user_id: Uuid,
        f: impl FnOnce(&LessonSession) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let sessions = self.sessions.read().await;
        let lesson_session = owned_session(sessions.get(&id), user_id)?;
        f(lesson_session)
    }

    pub async fn update<T>(
        &self,
        id: Uuid,
        user_id: Uuid,
        f: impl FnOnce(&mut LessonSession) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut sessions = self.sessions.write().await;
        let lesson_session = match sessions.get_mut(&id) {
            Some(s) if s.user_id == user_id => s,
            Some(_) => return Err(forbidden()),
            None => return Err(not_found()),
        };
        lesson_session.last_active_at = Utc::now();
        f(lesson_session)
    }

    /// Drop the sessions `user_id` started at or before `signed_out_at`.
    /// Returns how many were dropped.
    pub async fn remove_for_user(&self, user_id: Uuid, signed_out_at: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id || s.started_at > signed_out_at);
        before - sessions.len()
    }

    /// Drop every session last touched before `cutoff`. Returns how many were dropped.
    pub async fn remove_idle(&self, cutoff: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_active_at >= cutoff);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    pub async fn count_for_user(&self, user_id: Uuid) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id)
            .count()
    }
}

fn owned_session(
    lesson_session: Option<&LessonSession>,
    user_id: Uuid,
) -> Result<&LessonSession, ApiError> {
    match lesson_session {
        Some(s) if s.user_id == user_id => Ok(s),
        Some(_) => Err(forbidden()),
        None => Err(not_found()),
    }
}

fn forbidden() -> ApiError {
    ApiError::Forbidden("This session belongs to another user".to_string())
}

fn not_found() -> ApiError {
    ApiError::NotFound("Session not found".to_string())
}
