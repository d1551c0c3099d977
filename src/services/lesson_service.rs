use sqlx::PgPool;
use tracing::{info, warn};

use super::ServiceError;
use crate::database::models::Lesson;
use crate::middleware::auth::AuthUser;
use crate::types::{LessonCreate, LessonUpdate};

const SELECT_LESSON: &str = "SELECT id, title, content, course_id FROM lessons WHERE id = $1";

pub struct LessonService {
    pool: PgPool,
}

impl LessonService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a lesson under an existing course owned by the caller. The
    /// parent must exist and belong to the caller; orphan lessons are never
    /// inserted.
    pub async fn create_lesson(
        &self,
        payload: LessonCreate,
        course_id: i64,
        user: &AuthUser,
    ) -> Result<Lesson, ServiceError> {
        info!(
            "Creating lesson '{}' | course_id={} user_id={}",
            payload.title, course_id, user.id
        );

        let instructor_id = self.fetch_course_owner(course_id).await?;
        if instructor_id != user.id {
            warn!(
                "Forbidden | user_id={} tried to add a lesson | course_id={}",
                user.id, course_id
            );
            return Err(ServiceError::Forbidden(
                "You are not allowed to add lessons to this course".to_string(),
            ));
        }

        let lesson: Lesson = sqlx::query_as(
            "INSERT INTO lessons (title, content, course_id) \
             VALUES ($1, $2, $3) \
             RETURNING id, title, content, course_id",
        )
        .bind(&payload.title)
        .bind(&payload.content)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        info!("Lesson created | lesson_id={} title='{}'", lesson.id, lesson.title);
        Ok(lesson)
    }

    pub async fn list_lessons(&self, course_id: i64) -> Result<Vec<Lesson>, ServiceError> {
        info!("Fetching lessons | course_id={}", course_id);

        let lessons: Vec<Lesson> = sqlx::query_as(
            "SELECT id, title, content, course_id FROM lessons \
             WHERE course_id = $1 ORDER BY id",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        info!("Found {} lessons | course_id={}", lessons.len(), course_id);
        Ok(lessons)
    }

    pub async fn get_lesson(&self, lesson_id: i64) -> Result<Lesson, ServiceError> {
        info!("Fetching lesson | lesson_id={}", lesson_id);

        let lesson = self.fetch_lesson(lesson_id).await?;

        info!("Found lesson | lesson_id={} title='{}'", lesson.id, lesson.title);
        Ok(lesson)
    }

    /// Apply the set fields of a partial update to a lesson whose parent
    /// course is owned by the caller.
    pub async fn update_lesson(
        &self,
        lesson_id: i64,
        payload: LessonUpdate,
        user: &AuthUser,
    ) -> Result<Lesson, ServiceError> {
        info!("Updating lesson | lesson_id={} user_id={}", lesson_id, user.id);

        let mut lesson = self.fetch_lesson(lesson_id).await?;
        self.authorize(&lesson, user, "update this lesson").await?;

        lesson.apply_update(&payload);

        sqlx::query("UPDATE lessons SET title = $1, content = $2 WHERE id = $3")
            .bind(&lesson.title)
            .bind(&lesson.content)
            .bind(lesson.id)
            .execute(&self.pool)
            .await?;

        info!("Lesson updated | lesson_id={} title='{}'", lesson.id, lesson.title);
        Ok(lesson)
    }

    pub async fn delete_lesson(&self, lesson_id: i64, user: &AuthUser) -> Result<(), ServiceError> {
        info!("Deleting lesson | lesson_id={} user_id={}", lesson_id, user.id);

        let lesson = self.fetch_lesson(lesson_id).await?;
        self.authorize(&lesson, user, "delete this lesson").await?;

        sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .execute(&self.pool)
            .await?;

        info!("Lesson deleted | lesson_id={}", lesson_id);
        Ok(())
    }

    async fn fetch_lesson(&self, lesson_id: i64) -> Result<Lesson, ServiceError> {
        sqlx::query_as(SELECT_LESSON)
            .bind(lesson_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                warn!("Lesson not found | lesson_id={}", lesson_id);
                ServiceError::NotFound("Lesson not found".to_string())
            })
    }

    async fn fetch_course_owner(&self, course_id: i64) -> Result<String, ServiceError> {
        let instructor_id: Option<(String,)> =
            sqlx::query_as("SELECT instructor_id FROM courses WHERE id = $1")
                .bind(course_id)
                .fetch_optional(&self.pool)
                .await?;

        instructor_id.map(|(id,)| id).ok_or_else(|| {
            warn!("Course not found | course_id={}", course_id);
            ServiceError::NotFound("Course not found".to_string())
        })
    }

    /// Only the instructor of the parent course may mutate a lesson.
    async fn authorize(
        &self,
        lesson: &Lesson,
        user: &AuthUser,
        action: &str,
    ) -> Result<(), ServiceError> {
        let instructor_id = self.fetch_course_owner(lesson.course_id).await?;
        if instructor_id != user.id {
            warn!(
                "Forbidden | user_id={} tried to {} | lesson_id={}",
                user.id, action, lesson.id
            );
            return Err(ServiceError::Forbidden(format!(
                "You are not allowed to {}",
                action
            )));
        }
        Ok(())
    }
}
