use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use habla_grading::{Advance, GradingError, QuestionResult, ScoreSummary, Verdict};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{grade, progress::LessonProgress, store::SessionSnapshot};
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    extract::ApiJson,
    metrics::{record_grading_verdict, record_session_event},
    middleware::rate_limit,
};

/// Create the practice routes
///
/// `/grade` keeps its own stricter limit instead of sharing the general one.
pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    Router::new()
        .route("/lessons/{id}/sessions", post(start_session))
        .route("/sessions/{id}", get(get_session))
        .route("/sessions/{id}/answers/{index}", put(submit_answer))
        .route("/sessions/{id}/answers/{index}/check", post(check_answer))
        .route("/sessions/{id}/advance", post(advance))
        .route("/sessions/{id}/results", get(results))
        .route("/sessions/{id}/restart", post(restart))
        .route("/sessions/{id}/questions/{index}/hint", get(hint))
        .route("/me/progress", get(my_progress))
        .layer(make_rate_limit_layer!(
            rate_limit::GENERAL_REPLENISH_SECONDS,
            rate_limit::GENERAL_BURST_SIZE
        ))
        .merge(grade::routes())
}

#[derive(Debug, Deserialize)]
pub struct AnswerSubmission {
    /// `null` is accepted by the parser and rejected as invalid input.
    pub answer: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    pub index: usize,
    pub correct: bool,
    pub verdict: Verdict,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdvanceResponse {
    pub advance: Advance,
    pub session: SessionSnapshot,
    /// Present once the last question has been passed
    pub progress: Option<LessonProgress>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub summary: ScoreSummary,
    pub results: Vec<QuestionResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HintResponse {
    pub index: usize,
    pub answers: Vec<String>,
}

async fn start_session(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(lesson_id): Path<Uuid>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ApiError> {
    let lesson = state
        .lessons
        .get(lesson_id)
        .await
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    let snapshot = state.sessions.start(auth_user.user_id, &lesson).await?;
    record_session_event("started");

    Ok((StatusCode::CREATED, Json(snapshot)))
}

async fn get_session(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let snapshot = state
        .sessions
        .read(id, auth_user.user_id, |s| Ok(SessionSnapshot::from(s)))
        .await?;
    Ok(Json(snapshot))
}

async fn submit_answer(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path((id, index)): Path<(Uuid, usize)>,
    ApiJson(payload): ApiJson<AnswerSubmission>,
) -> Result<StatusCode, ApiError> {
    let answer = payload.answer.ok_or(GradingError::InvalidInput)?;

    state
        .sessions
        .update(id, auth_user.user_id, |s| {
            s.session.submit_answer(index, answer)?;
            Ok(())
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn check_answer(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<CheckResponse>, ApiError> {
    let (correct, verdict) = state
        .sessions
        .update(id, auth_user.user_id, |s| {
            let correct = s.session.check_answer(index)?;
            let verdict = s
                .session
                .verdict(index)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("verdict missing after check"))?;
            Ok((correct, verdict))
        })
        .await?;

    record_grading_verdict(correct);

    Ok(Json(CheckResponse {
        index,
        correct,
        verdict,
    }))
}

async fn advance(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdvanceResponse>, ApiError> {
    let (advance, snapshot, summary) = state
        .sessions
        .update(id, auth_user.user_id, |s| {
            let advance = s.session.advance()?;
            Ok((advance, SessionSnapshot::from(&*s), s.session.summary()))
        })
        .await?;

    let progress = match advance {
        Advance::Complete => {
            record_session_event("completed");
            Some(
                state
                    .progress
                    .record(auth_user.user_id, snapshot.lesson_id, &summary)
                    .await,
            )
        }
        Advance::Continue(_) => None,
    };

    Ok(Json(AdvanceResponse {
        advance,
        session: snapshot,
        progress,
    }))
}

async fn results(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResultsResponse>, ApiError> {
    let response = state
        .sessions
        .read(id, auth_user.user_id, |s| {
            Ok(ResultsResponse {
                summary: s.session.summary(),
                results: s.session.results(),
            })
        })
        .await?;
    Ok(Json(response))
}

async fn restart(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let snapshot = state
        .sessions
        .update(id, auth_user.user_id, |s| {
            s.session.restart();
            Ok(SessionSnapshot::from(&*s))
        })
        .await?;

    record_session_event("restarted");
    Ok(Json(snapshot))
}

/// Reveal the accepted spellings of a question with more than one, as long as
/// it has not been checked yet.
async fn hint(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<HintResponse>, ApiError> {
    let answers = state
        .sessions
        .read(id, auth_user.user_id, |s| {
            let question = s.session.question(index)?;
            if question.answers.len() < 2 || s.session.verdict(index).is_some() {
                return Err(ApiError::Validation(
                    "No hint available for this question".to_string(),
                ));
            }
            Ok(question.answers.to_vec())
        })
        .await?;

    Ok(Json(HintResponse { index, answers }))
}

async fn my_progress(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Json<Vec<LessonProgress>> {
    Json(state.progress.for_user(auth_user.user_id).await)
}
