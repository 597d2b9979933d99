//! Grading a user answer against an accepted-answer set.
//!
//! The accent rule is asymmetric: a user may omit a diacritic that the
//! accepted answer has (`facil` for `fácil`), but may not add one the accepted
//! answer lacks (`fácil` for `facil`).

use serde::{Deserialize, Serialize};

use crate::{
    error::{GradingError, Result},
    normalizer::{NormalizedForm, has_diacritic, normalize},
};

/// Outcome of comparing one normalized answer with one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Match,
    /// The deaccented forms differ.
    BaseMismatch,
    /// The deaccented forms agree but the folded forms have a different
    /// number of positions, so they cannot be aligned. Treated as a rejection.
    LengthMismatch,
    /// The user wrote a diacritic at `position` where the candidate has none.
    AccentAdded { position: usize },
}

/// Accent status of one aligned position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccentStatus {
    Exact,
    /// Expected a diacritic, got the plain letter. Tolerated.
    AccentOmitted,
    /// Got a diacritic where none was expected. Rejected.
    AccentAdded,
    /// Both carry a diacritic but not the same one.
    AccentDiffers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharDiagnostic {
    pub position: usize,
    pub given: String,
    pub expected: String,
    pub status: AccentStatus,
}

/// Result of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub correct: bool,
    /// Index of the accepted answer that matched.
    pub matched_answer: Option<usize>,
    /// Per-position diagnostic against the matched answer, or against the
    /// first answer that only failed on an added accent. Empty otherwise.
    pub diagnostics: Vec<CharDiagnostic>,
}

/// Compare a normalized user answer with one normalized candidate.
pub fn compare(user: &NormalizedForm, candidate: &NormalizedForm) -> Comparison {
    if user.deaccented_folded() != candidate.deaccented_folded() {
        return Comparison::BaseMismatch;
    }

    let given = user.positions();
    let expected = candidate.positions();
    if given.len() != expected.len() {
        return Comparison::LengthMismatch;
    }

    for (position, (g, e)) in given.iter().zip(&expected).enumerate() {
        // Omitted accents (plain `g`, accented `e`) fall through.
        if has_diacritic(g) && !has_diacritic(e) {
            return Comparison::AccentAdded { position };
        }
    }

    Comparison::Match
}

/// Whether `user_answer` matches any of `accepted`.
///
/// Stops at the first matching candidate.
///
/// # Errors
///
/// [`GradingError::EmptyAnswerSet`] when `accepted` is empty.
///
/// # Examples
/// ```
/// use habla_grading::is_correct;
///
/// assert!(is_correct("facil", &["fácil"]).unwrap());
/// assert!(!is_correct("fácil", &["facil"]).unwrap());
/// ```
pub fn is_correct<S: AsRef<str>>(user_answer: &str, accepted: &[S]) -> Result<bool> {
    if accepted.is_empty() {
        return Err(GradingError::EmptyAnswerSet);
    }

    let user = normalize(user_answer);
    Ok(accepted
        .iter()
        .any(|candidate| compare(&user, &normalize(candidate.as_ref())) == Comparison::Match))
}

/// Like [`is_correct`], but also reports which answer matched and how each
/// position lined up.
pub fn grade<S: AsRef<str>>(user_answer: &str, accepted: &[S]) -> Result<Verdict> {
    if accepted.is_empty() {
        return Err(GradingError::EmptyAnswerSet);
    }

    let user = normalize(user_answer);
    let mut closest: Option<NormalizedForm> = None;

    for (index, candidate) in accepted.iter().enumerate() {
        let candidate = normalize(candidate.as_ref());
        match compare(&user, &candidate) {
            Comparison::Match => {
                return Ok(Verdict {
                    correct: true,
                    matched_answer: Some(index),
                    diagnostics: aligned_diagnostics(&user, &candidate),
                });
            }
            Comparison::AccentAdded { .. } if closest.is_none() => closest = Some(candidate),
            _ => {}
        }
    }

    Ok(Verdict {
        correct: false,
        matched_answer: None,
        diagnostics: closest
            .map(|candidate| aligned_diagnostics(&user, &candidate))
            .unwrap_or_default(),
    })
}

/// Per-position diagnostic for a user answer against one candidate.
///
/// Returns `None` when the two cannot be aligned (different base letters or a
/// different number of positions).
pub fn diagnose(user_answer: &str, candidate: &str) -> Option<Vec<CharDiagnostic>> {
    let user = normalize(user_answer);
    let candidate = normalize(candidate);
    match compare(&user, &candidate) {
        Comparison::BaseMismatch | Comparison::LengthMismatch => None,
        Comparison::Match | Comparison::AccentAdded { .. } => {
            Some(aligned_diagnostics(&user, &candidate))
        }
    }
}

fn aligned_diagnostics(user: &NormalizedForm, candidate: &NormalizedForm) -> Vec<CharDiagnostic> {
    user.positions()
        .into_iter()
        .zip(candidate.positions())
        .enumerate()
        .map(|(position, (given, expected))| {
            let status = match (has_diacritic(given), has_diacritic(expected)) {
                (false, true) => AccentStatus::AccentOmitted,
                (true, false) => AccentStatus::AccentAdded,
                (true, true) if given != expected => AccentStatus::AccentDiffers,
                _ => AccentStatus::Exact,
            };
            CharDiagnostic {
                position,
                given: given.to_string(),
                expected: expected.to_string(),
                status,
            }
        })
        .collect()
}
