use sqlx::PgPool;
use tracing::info;

use super::manager::DatabaseError;

const CREATE_COURSES: &str = r#"
CREATE TABLE IF NOT EXISTS courses (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    price DOUBLE PRECISION NOT NULL,
    instructor_id TEXT NOT NULL
)
"#;

const CREATE_LESSONS: &str = r#"
CREATE TABLE IF NOT EXISTS lessons (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    content TEXT,
    course_id BIGINT NOT NULL REFERENCES courses(id) ON DELETE CASCADE
)
"#;

const CREATE_LESSONS_COURSE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_lessons_course_id ON lessons(course_id)";

/// Idempotent startup DDL: creates the courses and lessons tables if absent.
/// Lessons carry a cascading foreign key so deleting a course removes its
/// lessons at the storage layer.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query(CREATE_COURSES).execute(pool).await?;
    sqlx::query(CREATE_LESSONS).execute(pool).await?;
    sqlx::query(CREATE_LESSONS_COURSE_INDEX).execute(pool).await?;

    info!("Database schema ensured");
    Ok(())
}
