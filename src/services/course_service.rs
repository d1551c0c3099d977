use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{info, warn};

use super::ServiceError;
use crate::database::models::{Course, Lesson};
use crate::middleware::auth::AuthUser;
use crate::types::{CourseCreate, CourseUpdate};

const SELECT_COURSE: &str =
    "SELECT id, title, description, price, instructor_id FROM courses WHERE id = $1";
const SELECT_LESSONS: &str =
    "SELECT id, title, content, course_id FROM lessons WHERE course_id = $1 ORDER BY id";

pub struct CourseService {
    pool: PgPool,
}

impl CourseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a course owned by the caller, along with any lessons supplied
    /// in the payload. The course and its lessons are inserted in a single
    /// transaction; a failure leaves nothing behind.
    pub async fn create_course(
        &self,
        payload: CourseCreate,
        user: &AuthUser,
    ) -> Result<(Course, Vec<Lesson>), ServiceError> {
        info!(
            "Creating course '{}' | instructor_id={}",
            payload.title, user.id
        );

        let mut tx = self.pool.begin().await?;

        let course: Course = sqlx::query_as(
            "INSERT INTO courses (title, description, price, instructor_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, title, description, price, instructor_id",
        )
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(&user.id)
        .fetch_one(&mut *tx)
        .await?;

        let mut lessons = Vec::with_capacity(payload.lessons.len());
        for lesson in &payload.lessons {
            let row: Lesson = sqlx::query_as(
                "INSERT INTO lessons (title, content, course_id) \
                 VALUES ($1, $2, $3) \
                 RETURNING id, title, content, course_id",
            )
            .bind(&lesson.title)
            .bind(&lesson.content)
            .bind(course.id)
            .fetch_one(&mut *tx)
            .await?;
            lessons.push(row);
        }

        tx.commit().await?;

        info!(
            "Course created | course_id={} lessons={}",
            course.id,
            lessons.len()
        );
        Ok((course, lessons))
    }

    /// List courses with offset/limit pagination, ordered by id so that
    /// paging is deterministic. The caller's identity is logged but does not
    /// filter the result.
    pub async fn list_courses(
        &self,
        skip: i64,
        limit: i64,
        user: &AuthUser,
    ) -> Result<Vec<(Course, Vec<Lesson>)>, ServiceError> {
        info!(
            "Fetching courses | user_id={} role={} skip={} limit={}",
            user.id, user.role, skip, limit
        );

        let courses: Vec<Course> = sqlx::query_as(
            "SELECT id, title, description, price, instructor_id FROM courses \
             ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        if courses.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = courses.iter().map(|c| c.id).collect();
        let lessons: Vec<Lesson> = sqlx::query_as(
            "SELECT id, title, content, course_id FROM lessons \
             WHERE course_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_course: HashMap<i64, Vec<Lesson>> = HashMap::new();
        for lesson in lessons {
            by_course.entry(lesson.course_id).or_default().push(lesson);
        }

        info!("Fetched {} courses", courses.len());
        Ok(courses
            .into_iter()
            .map(|course| {
                let lessons = by_course.remove(&course.id).unwrap_or_default();
                (course, lessons)
            })
            .collect())
    }

    pub async fn get_course(&self, course_id: i64) -> Result<(Course, Vec<Lesson>), ServiceError> {
        info!("Fetching course | course_id={}", course_id);

        let course = self.fetch_course(course_id).await?;
        let lessons = self.fetch_lessons(course_id).await?;

        info!("Found course | course_id={} title='{}'", course.id, course.title);
        Ok((course, lessons))
    }

    /// Apply the set fields of a partial update to a course owned by the
    /// caller. `instructor_id` and the lesson collection are never touched.
    pub async fn update_course(
        &self,
        course_id: i64,
        payload: CourseUpdate,
        user: &AuthUser,
    ) -> Result<(Course, Vec<Lesson>), ServiceError> {
        info!("Updating course | course_id={} user_id={}", course_id, user.id);

        let mut course = self.fetch_course(course_id).await?;
        self.authorize(&course, user, "update this course")?;

        course.apply_update(&payload);

        sqlx::query("UPDATE courses SET title = $1, description = $2, price = $3 WHERE id = $4")
            .bind(&course.title)
            .bind(&course.description)
            .bind(course.price)
            .bind(course.id)
            .execute(&self.pool)
            .await?;

        let lessons = self.fetch_lessons(course_id).await?;

        info!("Course updated | course_id={} title='{}'", course.id, course.title);
        Ok((course, lessons))
    }

    /// Delete a course owned by the caller; its lessons go with it via the
    /// cascading foreign key.
    pub async fn delete_course(&self, course_id: i64, user: &AuthUser) -> Result<(), ServiceError> {
        info!("Deleting course | course_id={} user_id={}", course_id, user.id);

        let course = self.fetch_course(course_id).await?;
        self.authorize(&course, user, "delete this course")?;

        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(&self.pool)
            .await?;

        info!("Course deleted | course_id={}", course_id);
        Ok(())
    }

    async fn fetch_course(&self, course_id: i64) -> Result<Course, ServiceError> {
        sqlx::query_as(SELECT_COURSE)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                warn!("Course not found | course_id={}", course_id);
                ServiceError::NotFound("Course not found".to_string())
            })
    }

    async fn fetch_lessons(&self, course_id: i64) -> Result<Vec<Lesson>, ServiceError> {
        let lessons = sqlx::query_as(SELECT_LESSONS)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(lessons)
    }

    fn authorize(&self, course: &Course, user: &AuthUser, action: &str) -> Result<(), ServiceError> {
        if course.instructor_id != user.id {
            warn!(
                "Forbidden | user_id={} tried to {} | course_id={}",
                user.id, action, course.id
            );
            return Err(ServiceError::Forbidden(format!(
                "You are not allowed to {}",
                action
            )));
        }
        Ok(())
    }
}
