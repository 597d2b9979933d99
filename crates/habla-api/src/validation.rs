//! Validation of lessons authored through the admin API.

use habla_grading::AcceptedAnswers;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::ApiError,
    lesson::{Lesson, PracticeQuestion},
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewLesson {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[validate(length(min = 1, message = "A lesson needs at least one question"))]
    pub questions: Vec<NewPracticeQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewPracticeQuestion {
    #[validate(length(min = 1, max = 500, message = "Question must be 1-500 characters"))]
    pub question: String,
    #[validate(length(min = 1, message = "At least one answer is required"))]
    pub answers: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
}

impl NewPracticeQuestion {
    fn trimmed(self) -> Self {
        Self {
            question: self.question.trim().to_string(),
            answers: self
                .answers
                .iter()
                .map(|a| a.trim())
                .filter(|a| !a.is_empty())
                .map(String::from)
                .collect(),
            ..self
        }
    }
}

/// Trim, validate and number a lesson submitted by an admin.
///
/// Blank answers are dropped before validation, so a question whose answers
/// are all blank is rejected. The returned lesson's `order_index` is a
/// placeholder; [`LessonStore::insert_last`](crate::lesson::LessonStore::insert_last)
/// assigns the real one.
pub fn validate_new_lesson(new_lesson: NewLesson) -> Result<Lesson, ApiError> {
    let new_lesson = NewLesson {
        title: new_lesson.title.trim().to_string(),
        description: new_lesson.description.trim().to_string(),
        questions: new_lesson
            .questions
            .into_iter()
            .map(NewPracticeQuestion::trimmed)
            .collect(),
        ..new_lesson
    };
    new_lesson.validate()?;

    let mut questions = Vec::with_capacity(new_lesson.questions.len());
    for (i, q) in new_lesson.questions.into_iter().enumerate() {
        let number = i + 1;
        q.validate()
            .map_err(|e| ApiError::Validation(format!("Question {number}: {e}")))?;

        let answers = AcceptedAnswers::new(q.answers)
            .map_err(|e| ApiError::Validation(format!("Question {number}: {e}")))?;

        questions.push(PracticeQuestion {
            question: q.question,
            answers,
            image: q.image,
            audio: q.audio,
            order_index: number as u32,
        });
    }

    Ok(Lesson {
        id: Uuid::new_v4(),
        title: new_lesson.title,
        description: new_lesson.description,
        order_index: 0,
        image: new_lesson.image,
        questions,
    })
}
