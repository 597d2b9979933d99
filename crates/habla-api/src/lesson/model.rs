use habla_grading::{AcceptedAnswers, Question};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A lesson and the practice questions that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Position in the course, lowest first
    pub order_index: u32,
    /// Object storage reference for the cover image
    #[serde(default)]
    pub image: Option<String>,
    pub questions: Vec<PracticeQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeQuestion {
    pub question: String,
    pub answers: AcceptedAnswers,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
    pub order_index: u32,
}

impl PracticeQuestion {
    pub fn to_question(&self) -> Question {
        Question::new(self.question.clone(), self.answers.clone())
    }
}

impl Lesson {
    /// Grading questions in lesson order.
    pub fn to_questions(&self) -> Vec<Question> {
        self.questions.iter().map(PracticeQuestion::to_question).collect()
    }
}

/// Lesson as listed in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub order_index: u32,
    pub image: Option<String>,
    pub question_count: usize,
}

impl From<&Lesson> for LessonSummary {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title.clone(),
            description: lesson.description.clone(),
            order_index: lesson.order_index,
            image: lesson.image.clone(),
            question_count: lesson.questions.len(),
        }
    }
}

/// Lesson as shown to a learner. Accepted answers are withheld.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub order_index: u32,
    pub image: Option<String>,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub question: String,
    pub image: Option<String>,
    pub audio: Option<String>,
    pub order_index: u32,
    /// How many spellings are accepted, so clients know whether a hint exists
    pub answer_count: usize,
}

impl From<&Lesson> for LessonView {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title.clone(),
            description: lesson.description.clone(),
            order_index: lesson.order_index,
            image: lesson.image.clone(),
            questions: lesson
                .questions
                .iter()
                .map(|q| QuestionView {
                    question: q.question.clone(),
                    image: q.image.clone(),
                    audio: q.audio.clone(),
                    order_index: q.order_index,
                    answer_count: q.answers.len(),
                })
                .collect(),
        }
    }
}

pub const GREETINGS_LESSON_ID: Uuid = Uuid::from_u128(0x6ab1_a000_0000_4000_8000_0000_0000_0001);
pub const BASICS_LESSON_ID: Uuid = Uuid::from_u128(0x6ab1_a000_0000_4000_8000_0000_0000_0002);

fn seed_question(order_index: u32, question: &str, answers: &[&str]) -> PracticeQuestion {
    PracticeQuestion {
        question: question.to_string(),
        answers: AcceptedAnswers::new(answers.iter().map(|a| a.to_string()).collect())
            .expect("seed questions have answers"),
        image: None,
        audio: None,
        order_index,
    }
}

/// Lessons served when no `LESSONS_PATH` is configured.
pub fn seed_lessons() -> Vec<Lesson> {
    vec![
        Lesson {
            id: GREETINGS_LESSON_ID,
            title: "Greetings".to_string(),
            description: "Say hello and goodbye in Spanish".to_string(),
            order_index: 1,
            image: None,
            questions: vec![
                seed_question(1, "Hello", &["hola"]),
                seed_question(2, "Goodbye", &["adiós", "chao"]),
                seed_question(3, "Good morning", &["buenos días"]),
                seed_question(4, "Thank you", &["gracias"]),
            ],
        },
        Lesson {
            id: BASICS_LESSON_ID,
            title: "Basics".to_string(),
            description: "Everyday words with accents and tildes".to_string(),
            order_index: 2,
            image: None,
            questions: vec![
                seed_question(1, "Easy", &["fácil"]),
                seed_question(2, "Boy", &["niño", "chico"]),
                seed_question(3, "Year", &["año"]),
                seed_question(4, "Tea", &["té"]),
                seed_question(5, "Penguin", &["pingüino"]),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_withholds_answers() {
        let lesson = &seed_lessons()[0];
        let json = serde_json::to_string(&LessonView::from(lesson)).unwrap();
        assert!(!json.contains("adiós"));
        assert!(json.contains("\"answer_count\":2"));
    }

    #[test]
    fn test_summary_counts_questions() {
        let lesson = &seed_lessons()[1];
        let summary = LessonSummary::from(lesson);
        assert_eq!(summary.question_count, 5);
        assert_eq!(summary.id, BASICS_LESSON_ID);
    }

    #[test]
    fn test_lesson_deserializes_without_media() {
        let lesson: Lesson = serde_json::from_str(
            r#"{
                "id": "6ab1a000-0000-4000-8000-000000000009",
                "title": "Colors",
                "description": "Basic colors",
                "order_index": 3,
                "questions": [
                    {"question": "Red", "answers": ["rojo"], "order_index": 1}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(lesson.image, None);
        assert_eq!(lesson.to_questions()[0].answers.canonical(), "rojo");
    }

    #[test]
    fn test_lesson_with_empty_answers_rejected() {
        let parsed: Result<Lesson, _> = serde_json::from_str(
            r#"{
                "id": "6ab1a000-0000-4000-8000-000000000009",
                "title": "Colors",
                "description": "Basic colors",
                "order_index": 3,
                "questions": [{"question": "Red", "answers": [], "order_index": 1}]
            }"#,
        );
        assert!(parsed.is_err());
    }
}
