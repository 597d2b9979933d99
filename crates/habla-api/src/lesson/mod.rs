pub mod model;
pub mod routes;
pub mod store;

pub use model::{Lesson, LessonSummary, LessonView, PracticeQuestion, QuestionView};
pub use routes::routes;
pub use store::LessonStore;
