use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, Instructor, PaginatableRepository, ResourceTyped,
        entity::{Course, CourseCreate, Lesson},
    },
    web::{
        AppState, ErrorResponse, WebError, WebResult,
        dto::{courses::CourseResponse, lessons::LessonResponse},
        routes::PaginationQuery,
    },
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CourseBody {
    pub title: String,
    pub description: String,
    /// Must reference a user with the instructor role
    pub instructor_id: Uuid,
    pub category_id: Option<Uuid>,
}

impl CourseBody {
    async fn into_create(self, state: &AppState) -> WebResult<CourseCreate> {
        let instructor = Instructor::fetch(state.pool(), self.instructor_id)
            .await
            .map_err(|e| WebError::from_database(Course::get_resource_type(), e))?;
        Ok(CourseCreate::new(
            self.title,
            self.description,
            &instructor,
            self.category_id,
        ))
    }
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(course_create_handler))
        .route("/page", get(course_list_handler))
        .route(
            "/{id}",
            get(course_get_handler)
                .put(course_update_handler)
                .delete(course_delete_handler),
        )
        .route("/{id}/lessons", get(course_lessons_handler))
        .with_state(state)
}

async fn find_course(state: &AppState, id: Uuid) -> WebResult<Course> {
    Course::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Course::get_resource_type()))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CourseBody,
    responses(
        (status = 201, description = "Course created successfully", body = CourseResponse),
        (status = 422, description = "Invalid title, unknown category, or instructor is not an instructor", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub async fn course_create_handler(
    State(state): State<AppState>,
    Json(payload): Json<CourseBody>,
) -> WebResult<impl IntoResponse> {
    let data = payload.into_create(&state).await?;
    let created = Course::create(state.pool(), data)
        .await
        .map_err(|e| WebError::from_database(Course::get_resource_type(), e))?;

    tracing::info!("course {} created", created.id());
    Ok((StatusCode::CREATED, Json(CourseResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/page",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<CourseResponse>),
        (status = 400, description = "Pagination out of range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub async fn course_list_handler(
    Query(page): Query<PaginationQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let (limit, offset) = page.validate()?;
    let courses = Course::page(state.pool(), limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(courses.map(CourseResponse::from))))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub async fn course_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let course = find_course(&state, id).await?;
    Ok((StatusCode::OK, Json(CourseResponse::from(course))))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    request_body = CourseBody,
    params(
        ("id" = Uuid, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Course updated successfully", body = CourseResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 422, description = "Invalid title, unknown category, or instructor is not an instructor", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub async fn course_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CourseBody>,
) -> WebResult<impl IntoResponse> {
    let found = find_course(&state, id).await?;
    let data = payload.into_create(&state).await?;
    let updated = found
        .update(state.pool(), data)
        .await
        .map_err(|e| WebError::from_database(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(CourseResponse::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    description = "Deletes the course with its lessons and enrollments",
    params(
        ("id" = Uuid, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Course deleted successfully"),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub async fn course_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let found = find_course(&state, id).await?;
    found
        .delete(state.pool())
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    tracing::info!("course {id} deleted");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/lessons",
    params(
        ("id" = Uuid, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Lessons of the course", body = Vec<LessonResponse>),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub async fn course_lessons_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let course = find_course(&state, id).await?;
    let lessons = Lesson::all_by_course(state.pool(), course.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    let lessons: Vec<LessonResponse> = lessons.into_iter().map(LessonResponse::from).collect();
    Ok((StatusCode::OK, Json(lessons)))
}
