use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use super::model::{LessonSummary, LessonView};
use crate::{
    ApiState,
    auth::{AdminUser, AuthUser},
    error::ApiError,
    extract::ApiJson,
    middleware::rate_limit,
    validation::{NewLesson, validate_new_lesson},
};

/// Create the lesson routes
pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    Router::new()
        .route("/lessons", get(list_lessons))
        .route("/lessons/{id}", get(get_lesson))
        .route("/admin/lessons", post(create_lesson))
        .layer(make_rate_limit_layer!(
            rate_limit::GENERAL_REPLENISH_SECONDS,
            rate_limit::GENERAL_BURST_SIZE
        ))
}

async fn list_lessons(_: AuthUser, State(state): State<ApiState>) -> Json<Vec<LessonSummary>> {
    let lessons = state.lessons.list().await;
    Json(lessons.iter().map(LessonSummary::from).collect())
}

async fn get_lesson(
    _: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LessonView>, ApiError> {
    let lesson = state
        .lessons
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;
    Ok(Json(LessonView::from(&lesson)))
}

async fn create_lesson(
    AdminUser(admin): AdminUser,
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<NewLesson>,
) -> Result<(StatusCode, Json<LessonView>), ApiError> {
    let lesson = validate_new_lesson(payload)?;
    let lesson = state.lessons.insert_last(lesson).await;

    tracing::info!(
        lesson_id = %lesson.id,
        admin_id = %admin.user_id,
        questions = lesson.questions.len(),
        "Lesson created"
    );

    Ok((StatusCode::CREATED, Json(LessonView::from(&lesson))))
}
