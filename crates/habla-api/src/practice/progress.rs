use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use habla_grading::ScoreSummary;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A user's record for one completed lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub lesson_id: Uuid,
    pub best_score: usize,
    pub total: usize,
    pub best_percentage: u32,
    pub attempts: u32,
    pub last_completed_at: DateTime<Utc>,
}

/// Completed lessons per user. Kept in memory for the life of the process.
#[derive(Clone, Debug, Default)]
pub struct ProgressStore {
    progress: Arc<RwLock<HashMap<Uuid, HashMap<Uuid, LessonProgress>>>>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed attempt, keeping the best score seen so far.
    pub async fn record(&self, user_id: Uuid, lesson_id: Uuid, summary: &ScoreSummary) -> LessonProgress {
        let now = Utc::now();
        let mut progress = self.progress.write().await;
        let entry = progress
            .entry(user_id)
            .or_default()
            .entry(lesson_id)
            .and_modify(|p| {
                p.attempts += 1;
                p.last_completed_at = now;
                if summary.percentage > p.best_percentage {
                    p.best_score = summary.score;
                    p.total = summary.total;
                    p.best_percentage = summary.percentage;
                }
            })
            .or_insert_with(|| LessonProgress {
                lesson_id,
                best_score: summary.score,
                total: summary.total,
                best_percentage: summary.percentage,
                attempts: 1,
                last_completed_at: now,
            });

        tracing::info!(
            %user_id,
            %lesson_id,
            score = summary.score,
            total = summary.total,
            attempts = entry.attempts,
            "Lesson completed"
        );
        entry.clone()
    }

    /// Completed lessons, most recent first.
    pub async fn for_user(&self, user_id: Uuid) -> Vec<LessonProgress> {
        let mut lessons: Vec<LessonProgress> = self
            .progress
            .read()
            .await
            .get(&user_id)
            .map(|lessons| lessons.values().cloned().collect())
            .unwrap_or_default();
        lessons.sort_by(|a, b| b.last_completed_at.cmp(&a.last_completed_at));
        lessons
    }
}
