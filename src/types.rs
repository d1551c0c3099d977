/// Transfer objects for the HTTP API. These are the validated request and
/// response shapes at the boundary, distinct from the persisted rows in
/// `database::models`.
use serde::{Deserialize, Serialize};

use crate::database::models::{Course, Lesson};

// -------------------------------
// Lessons
// -------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LessonCreate {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LessonUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonResponse {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
}

impl From<Lesson> for LessonResponse {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title,
            content: lesson.content,
        }
    }
}

// -------------------------------
// Courses
// -------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CourseCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub lessons: Vec<LessonCreate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    /// Accepted on the wire but not applied: replace-vs-merge semantics for
    /// child lessons on update are unspecified, so the field is ignored.
    pub lessons: Option<Vec<LessonCreate>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub instructor_id: String,
    pub lessons: Vec<LessonResponse>,
}

impl CourseResponse {
    pub fn from_parts(course: Course, lessons: Vec<Lesson>) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            price: course.price,
            instructor_id: course.instructor_id,
            lessons: lessons.into_iter().map(LessonResponse::from).collect(),
        }
    }
}

// -------------------------------
// Confirmations
// -------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
