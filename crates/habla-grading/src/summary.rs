use serde::{Deserialize, Serialize};

/// Final score of a session as shown on the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub score: usize,
    pub total: usize,
    /// `score / total` as a whole percentage, rounded half up.
    pub percentage: u32,
    pub message: String,
}

impl ScoreSummary {
    pub fn new(score: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (score as f64 / total as f64 * 100.0).round() as u32
        };

        Self {
            score,
            total,
            percentage,
            message: score_message(percentage).to_string(),
        }
    }
}

/// Encouragement shown next to a percentage.
///
/// * ≥ 90: "Excellent work!"
/// * ≥ 80: "Great job!"
/// * ≥ 70: "Well done!"
/// * ≥ 50: "Good effort!"
/// * otherwise: "Keep practicing!"
pub fn score_message(percentage: u32) -> &'static str {
    match percentage {
        p if p >= 90 => "Excellent work!",
        p if p >= 80 => "Great job!",
        p if p >= 70 => "Well done!",
        p if p >= 50 => "Good effort!",
        _ => "Keep practicing!",
    }
}
