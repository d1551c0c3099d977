use axum::{
    extract::Path,
    response::Json,
    routing::get,
    Extension, Router,
};

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::services::LessonService;
use crate::types::{LessonCreate, LessonResponse, LessonUpdate, MessageResponse};

pub fn routes() -> Router {
    // POST interprets the path segment as the parent course id; the other
    // verbs address a lesson id.
    Router::new()
        .route(
            "/lessons/:id",
            get(get_lesson_by_id)
                .post(create_lesson)
                .put(update_lesson)
                .delete(delete_lesson),
        )
        .route("/lessons/course/:course_id", get(get_lessons))
}

async fn service() -> Result<LessonService, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(LessonService::new(pool))
}

/// POST /lessons/:course_id - Create a lesson under a course owned by the caller
async fn create_lesson(
    Path(course_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<LessonCreate>,
) -> Result<Json<LessonResponse>, ApiError> {
    let lesson = service()
        .await?
        .create_lesson(payload, course_id, &user)
        .await?;
    Ok(Json(LessonResponse::from(lesson)))
}

/// GET /lessons/course/:course_id - List a course's lessons
async fn get_lessons(
    Path(course_id): Path<i64>,
    Extension(_user): Extension<AuthUser>,
) -> Result<Json<Vec<LessonResponse>>, ApiError> {
    let lessons = service().await?.list_lessons(course_id).await?;
    Ok(Json(lessons.into_iter().map(LessonResponse::from).collect()))
}

/// GET /lessons/:lesson_id - Get a single lesson
async fn get_lesson_by_id(
    Path(lesson_id): Path<i64>,
    Extension(_user): Extension<AuthUser>,
) -> Result<Json<LessonResponse>, ApiError> {
    let lesson = service().await?.get_lesson(lesson_id).await?;
    Ok(Json(LessonResponse::from(lesson)))
}

/// PUT /lessons/:lesson_id - Partially update a lesson
async fn update_lesson(
    Path(lesson_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<LessonUpdate>,
) -> Result<Json<LessonResponse>, ApiError> {
    let lesson = service()
        .await?
        .update_lesson(lesson_id, payload, &user)
        .await?;
    Ok(Json(LessonResponse::from(lesson)))
}

/// DELETE /lessons/:lesson_id - Delete a lesson
async fn delete_lesson(
    Path(lesson_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MessageResponse>, ApiError> {
    service().await?.delete_lesson(lesson_id, &user).await?;
    Ok(Json(MessageResponse::new("Lesson deleted successfully")))
}
