use thiserror::Error;

/// Errors raised by the grading core.
///
/// Every precondition violation has its own variant so callers never have to
/// guess whether a `false` verdict was a real answer or a rejected call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GradingError {
    /// An answer was missing where a string was required. The empty string is
    /// always a valid answer.
    #[error("Answer input is missing")]
    InvalidInput,
    /// A question was graded against an empty accepted-answer set.
    #[error("Accepted answer set is empty")]
    EmptyAnswerSet,
    /// `check_answer` or `advance` was called before an answer was submitted
    /// and checked for the question.
    #[error("No answer submitted for question {index}")]
    NoAnswerSubmitted { index: usize },
    #[error("Question index {index} is out of range (session has {len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },
    /// The session is completed; only `restart` is allowed.
    #[error("Session is already completed")]
    SessionCompleted,
    #[error("A session needs at least one question")]
    NoQuestions,
}

pub type Result<T, E = GradingError> = std::result::Result<T, E>;
