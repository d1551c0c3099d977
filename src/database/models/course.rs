use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::CourseUpdate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    /// Identity of the creating instructor; set once at creation and never
    /// touched by updates.
    pub instructor_id: String,
}

impl Course {
    /// Merge the set fields of a partial update onto this course. Unset
    /// fields are left untouched; `instructor_id` is not updatable.
    pub fn apply_update(&mut self, update: &CourseUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(price) = update.price {
            self.price = price;
        }
    }
}
