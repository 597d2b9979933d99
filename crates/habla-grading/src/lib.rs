//! Answer grading for Habla practice sessions.
//!
//! This crate holds the free-text grading rules and the session state machine
//! that drives a lesson's questions. It performs no I/O: question data comes
//! from the caller.
//!
//! - [`normalizer`]: case folding, punctuation stripping and accent removal
//! - [`matcher`]: asymmetric accent comparison against accepted answers
//! - [`session`]: submit / check / advance / restart over a question list

pub mod answers;
pub mod error;
pub mod matcher;
pub mod normalizer;
pub mod session;
pub mod summary;

pub use answers::AcceptedAnswers;
pub use error::{GradingError, Result};
pub use matcher::{AccentStatus, CharDiagnostic, Comparison, Verdict, grade, is_correct};
pub use normalizer::{NormalizedForm, normalize};
pub use session::{Advance, Question, QuestionResult, Session, SessionState};
pub use summary::ScoreSummary;
