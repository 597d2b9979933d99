use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use habla_grading::GradingError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Grading(#[from] GradingError),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Grading(err) => match err {
                GradingError::InvalidInput | GradingError::QuestionOutOfRange { .. } => {
                    StatusCode::BAD_REQUEST
                }
                GradingError::NoAnswerSubmitted { .. } | GradingError::SessionCompleted => {
                    StatusCode::CONFLICT
                }
                // Bad lesson content from the question provider.
                GradingError::EmptyAnswerSet | GradingError::NoQuestions => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Internal(err) => tracing::error!(error = ?err, "Internal error"),
            Self::Grading(err) if status == StatusCode::UNPROCESSABLE_ENTITY => {
                tracing::warn!(error = %err, "Lesson data rejected by grader");
            }
            _ => tracing::debug!(error = %self, %status, "Request rejected"),
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// Malformed, mistyped or missing request bodies come back as the usual JSON
/// error body instead of axum's plain-text rejection.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grading_error_status() {
        assert_eq!(
            ApiError::from(GradingError::InvalidInput).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(GradingError::NoAnswerSubmitted { index: 1 }).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(GradingError::SessionCompleted).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(GradingError::EmptyAnswerSet).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = ApiError::from(anyhow::anyhow!("lessons.json: permission denied"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }
}
