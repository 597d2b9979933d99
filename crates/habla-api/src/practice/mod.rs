//! Practice sessions: a learner working through one lesson's questions.

pub mod grade;
pub mod progress;
pub mod routes;
pub mod store;

pub use progress::{LessonProgress, ProgressStore};
pub use routes::routes;
pub use store::{LessonSession, SessionSnapshot, SessionStore};
