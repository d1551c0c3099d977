use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::LessonUpdate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    /// Parent course; immutable after creation.
    pub course_id: i64,
}

impl Lesson {
    /// Merge the set fields of a partial update onto this lesson. The
    /// parent `course_id` is not updatable.
    pub fn apply_update(&mut self, update: &LessonUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(content) = &update.content {
            self.content = Some(content.clone());
        }
    }
}
