pub mod course_service;
pub mod lesson_service;

pub use course_service::CourseService;
pub use lesson_service::LessonService;

use thiserror::Error;

/// Errors surfaced by the course and lesson services. Not-found and
/// forbidden outcomes carry the client-facing message; storage failures stay
/// internal and are degraded to a generic error at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
