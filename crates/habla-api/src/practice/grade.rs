//! Stateless grading for clients that keep their own session state.

use axum::{Json, Router, routing::post};
use habla_grading::{GradingError, Verdict};
use serde::Deserialize;

use crate::{
    ApiState, auth::AuthUser, error::ApiError, extract::ApiJson, metrics::record_grading_verdict,
    middleware::rate_limit,
};

pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    Router::new()
        .route("/grade", post(grade_answer))
        .layer(make_rate_limit_layer!(
            rate_limit::GRADE_REPLENISH_SECONDS,
            rate_limit::GRADE_BURST_SIZE
        ))
}

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub answer: Option<String>,
    pub accepted_answers: Vec<String>,
}

async fn grade_answer(
    auth_user: AuthUser,
    ApiJson(payload): ApiJson<GradeRequest>,
) -> Result<Json<Verdict>, ApiError> {
    let answer = payload.answer.ok_or(GradingError::InvalidInput)?;
    let verdict = habla_grading::grade(&answer, payload.accepted_answers.as_slice())?;

    tracing::debug!(user_id = %auth_user.user_id, correct = verdict.correct, "Graded answer");
    record_grading_verdict(verdict.correct);

    Ok(Json(verdict))
}
