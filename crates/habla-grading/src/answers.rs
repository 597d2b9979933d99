use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::error::{GradingError, Result};

/// Every textual form accepted as correct for one question.
///
/// Never empty: construction and deserialization both reject an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AcceptedAnswers(Vec<String>);

impl AcceptedAnswers {
    pub fn new(answers: Vec<String>) -> Result<Self> {
        if answers.is_empty() {
            return Err(GradingError::EmptyAnswerSet);
        }
        Ok(Self(answers))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// The first accepted answer, usually the canonical spelling.
    pub fn canonical(&self) -> &str {
        &self.0[0]
    }
}

impl Deref for AcceptedAnswers {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<String>> for AcceptedAnswers {
    type Error = GradingError;

    fn try_from(answers: Vec<String>) -> Result<Self> {
        Self::new(answers)
    }
}

impl From<AcceptedAnswers> for Vec<String> {
    fn from(answers: AcceptedAnswers) -> Self {
        answers.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_rejected() {
        assert_eq!(
            AcceptedAnswers::new(Vec::new()),
            Err(GradingError::EmptyAnswerSet)
        );
    }

    #[test]
    fn test_canonical_is_first() {
        let answers = AcceptedAnswers::new(vec!["adiós".into(), "chao".into()]).unwrap();
        assert_eq!(answers.canonical(), "adiós");
        assert_eq!(answers.len(), 2);
    }

    #[test]
    fn test_deserialize_rejects_empty_list() {
        let parsed: std::result::Result<AcceptedAnswers, _> = serde_json::from_str("[]");
        assert!(parsed.is_err());

        let parsed: AcceptedAnswers = serde_json::from_str(r#"["hola"]"#).unwrap();
        assert_eq!(parsed.as_slice(), ["hola".to_string()]);
    }
}
