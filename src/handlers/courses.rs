use axum::{
    extract::{Path, Query},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::services::CourseService;
use crate::types::{CourseCreate, CourseResponse, CourseUpdate, MessageResponse};

pub fn routes() -> Router {
    Router::new()
        .route("/courses/", get(get_courses).post(create_course))
        .route(
            "/courses/:course_id",
            get(get_course_by_id).put(update_course).delete(delete_course),
        )
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

async fn service() -> Result<CourseService, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(CourseService::new(pool))
}

/// POST /courses/ - Create a course (with optional lessons) owned by the caller
async fn create_course(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CourseCreate>,
) -> Result<Json<CourseResponse>, ApiError> {
    let (course, lessons) = service().await?.create_course(payload, &user).await?;
    Ok(Json(CourseResponse::from_parts(course, lessons)))
}

/// GET /courses/?skip&limit - List courses
async fn get_courses(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = service()
        .await?
        .list_courses(query.skip, query.limit, &user)
        .await?;
    Ok(Json(
        courses
            .into_iter()
            .map(|(course, lessons)| CourseResponse::from_parts(course, lessons))
            .collect(),
    ))
}

/// GET /courses/:course_id - Get a single course with its lessons
async fn get_course_by_id(
    Path(course_id): Path<i64>,
    Extension(_user): Extension<AuthUser>,
) -> Result<Json<CourseResponse>, ApiError> {
    let (course, lessons) = service().await?.get_course(course_id).await?;
    Ok(Json(CourseResponse::from_parts(course, lessons)))
}

/// PUT /courses/:course_id - Partially update a course owned by the caller
async fn update_course(
    Path(course_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    let (course, lessons) = service()
        .await?
        .update_course(course_id, payload, &user)
        .await?;
    Ok(Json(CourseResponse::from_parts(course, lessons)))
}

/// DELETE /courses/:course_id - Delete a course and, by cascade, its lessons
async fn delete_course(
    Path(course_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MessageResponse>, ApiError> {
    service().await?.delete_course(course_id, &user).await?;
    Ok(Json(MessageResponse::new("Course deleted successfully")))
}
