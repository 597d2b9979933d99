//! Practice session state machine.
//!
//! A session walks an ordered list of questions. The caller submits an answer,
//! checks it, then advances:
//!
//! ```text
//! InProgress(0) --check--> InProgress(0) --advance--> InProgress(1) ... --advance--> Completed
//! Completed --restart--> InProgress(0)
//! ```
//!
//! `Session` is single-writer and does no locking of its own.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    answers::AcceptedAnswers,
    error::{GradingError, Result},
    matcher::{Verdict, grade},
    summary::ScoreSummary,
};

/// One question of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub answers: AcceptedAnswers,
}

impl Question {
    pub fn new(prompt: impl Into<String>, answers: AcceptedAnswers) -> Self {
        Self {
            prompt: prompt.into(),
            answers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "index", rename_all = "snake_case")]
pub enum SessionState {
    InProgress(usize),
    Completed,
}

/// What `advance` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "index", rename_all = "snake_case")]
pub enum Advance {
    /// Moved to the question at this index.
    Continue(usize),
    Complete,
}

/// A checked answer, as shown on the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question: String,
    pub user_answer: String,
    pub correct_answers: AcceptedAnswers,
    pub is_correct: bool,
}

#[derive(Debug, Clone)]
pub struct Session {
    questions: Vec<Question>,
    position: usize,
    completed: bool,
    answers: BTreeMap<usize, String>,
    verdicts: BTreeMap<usize, Verdict>,
}

impl Session {
    /// # Errors
    ///
    /// [`GradingError::NoQuestions`] when `questions` is empty.
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        if questions.is_empty() {
            return Err(GradingError::NoQuestions);
        }
        Ok(Self {
            questions,
            position: 0,
            completed: false,
            answers: BTreeMap::new(),
            verdicts: BTreeMap::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; a session holds at least one question.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Result<&Question> {
        self.questions
            .get(index)
            .ok_or(GradingError::QuestionOutOfRange {
                index,
                len: self.questions.len(),
            })
    }

    pub fn state(&self) -> SessionState {
        if self.completed {
            SessionState::Completed
        } else {
            SessionState::InProgress(self.position)
        }
    }

    /// Current index, or the question count once completed.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn verdict(&self, index: usize) -> Option<&Verdict> {
        self.verdicts.get(&index)
    }

    /// Record the raw answer for `index`. Does not grade it.
    ///
    /// Replacing a checked answer with a different one discards its verdict.
    pub fn submit_answer(&mut self, index: usize, raw: impl Into<String>) -> Result<()> {
        self.ensure_in_progress()?;
        self.question(index)?;

        let raw = raw.into();
        if self.answers.get(&index) != Some(&raw) {
            self.verdicts.remove(&index);
        }
        self.answers.insert(index, raw);
        Ok(())
    }

    /// Grade the submitted answer for `index` and record the verdict.
    ///
    /// Checking the same answer again returns the recorded verdict.
    pub fn check_answer(&mut self, index: usize) -> Result<bool> {
        self.ensure_in_progress()?;
        let question = self.question(index)?;

        if let Some(verdict) = self.verdicts.get(&index) {
            return Ok(verdict.correct);
        }

        let answer = self
            .answers
            .get(&index)
            .ok_or(GradingError::NoAnswerSubmitted { index })?;
        let verdict = grade(answer, question.answers.as_slice())?;
        let correct = verdict.correct;
        debug!(index, correct, "Answer checked");

        self.verdicts.insert(index, verdict);
        Ok(correct)
    }

    /// Move past the current question. The current question must be checked.
    pub fn advance(&mut self) -> Result<Advance> {
        self.ensure_in_progress()?;

        let index = self.position;
        if !self.verdicts.contains_key(&index) {
            return Err(GradingError::NoAnswerSubmitted { index });
        }

        if index + 1 < self.questions.len() {
            self.position += 1;
            Ok(Advance::Continue(self.position))
        } else {
            self.position = self.questions.len();
            self.completed = true;
            debug!(score = self.score(), total = self.len(), "Session completed");
            Ok(Advance::Complete)
        }
    }

    /// Number of checked answers that were correct.
    pub fn score(&self) -> usize {
        self.verdicts.values().filter(|v| v.correct).count()
    }

    pub fn restart(&mut self) {
        self.answers.clear();
        self.verdicts.clear();
        self.position = 0;
        self.completed = false;
    }

    /// Checked answers in question order.
    pub fn results(&self) -> Vec<QuestionResult> {
        self.verdicts
            .iter()
            .map(|(&index, verdict)| {
                let question = &self.questions[index];
                QuestionResult {
                    question: question.prompt.clone(),
                    user_answer: self.answers.get(&index).cloned().unwrap_or_default(),
                    correct_answers: question.answers.clone(),
                    is_correct: verdict.correct,
                }
            })
            .collect()
    }

    /// Percentage of the way through the session, counting the current
    /// question as reached.
    pub fn progress_percent(&self) -> f64 {
        if self.completed {
            return 100.0;
        }
        (self.position + 1) as f64 / self.questions.len() as f64 * 100.0
    }

    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary::new(self.score(), self.len())
    }

    fn ensure_in_progress(&self) -> Result<()> {
        if self.completed {
            return Err(GradingError::SessionCompleted);
        }
        Ok(())
    }
}
