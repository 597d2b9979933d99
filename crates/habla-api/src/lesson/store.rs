use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::Context;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::Lesson;

/// In-memory lesson catalogue shared by every request.
#[derive(Clone, Debug, Default)]
pub struct LessonStore {
    lessons: Arc<RwLock<HashMap<Uuid, Lesson>>>,
}

impl LessonStore {
    pub fn new(lessons: Vec<Lesson>) -> Self {
        let lessons = lessons
            .into_iter()
            .map(|mut lesson| {
                lesson.questions.sort_by_key(|q| q.order_index);
                (lesson.id, lesson)
            })
            .collect();

        Self {
            lessons: Arc::new(RwLock::new(lessons)),
        }
    }

    /// Read a JSON array of lessons from `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lessons from {}", path.display()))?;
        let lessons: Vec<Lesson> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse lessons in {}", path.display()))?;

        tracing::info!(count = lessons.len(), path = %path.display(), "Loaded lessons");
        Ok(Self::new(lessons))
    }

    /// All lessons in course order.
    pub async fn list(&self) -> Vec<Lesson> {
        let mut lessons: Vec<Lesson> = self.lessons.read().await.values().cloned().collect();
        lessons.sort_by_key(|lesson| lesson.order_index);
        lessons
    }

    pub async fn get(&self, id: Uuid) -> Option<Lesson> {
        self.lessons.read().await.get(&id).cloned()
    }

    /// Add `lesson` at the end of the course, overriding its `order_index`.
    pub async fn insert_last(&self, mut lesson: Lesson) -> Lesson {
        let mut lessons = self.lessons.write().await;
        lesson.order_index = lessons
            .values()
            .map(|l| l.order_index)
            .max()
            .unwrap_or(0)
            + 1;
        lessons.insert(lesson.id, lesson.clone());
        lesson
    }
}
