use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, PaginatableRepository, ResourceTyped,
        entity::{Lesson, LessonCreate},
    },
    web::{
        AppState, ErrorResponse, WebError, WebResult, dto::lessons::LessonResponse,
        routes::PaginationQuery,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(lesson_create_handler))
        .route("/page", get(lesson_list_handler))
        .route(
            "/{id}",
            get(lesson_get_handler)
                .put(lesson_update_handler)
                .delete(lesson_delete_handler),
        )
        .with_state(state)
}

async fn find_lesson(state: &AppState, id: Uuid) -> WebResult<Lesson> {
    Lesson::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))
}

#[utoipa::path(
    post,
    path = "/api/v1/lessons",
    request_body = LessonCreate,
    responses(
        (status = 201, description = "Lesson created successfully", body = LessonResponse),
        (status = 422, description = "Invalid title or video URL, or unknown course", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
pub async fn lesson_create_handler(
    State(state): State<AppState>,
    Json(payload): Json<LessonCreate>,
) -> WebResult<impl IntoResponse> {
    let created = Lesson::create(state.pool(), payload)
        .await
        .map_err(|e| WebError::from_database(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(LessonResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/page",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<LessonResponse>),
        (status = 400, description = "Pagination out of range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
pub async fn lesson_list_handler(
    Query(page): Query<PaginationQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let (limit, offset) = page.validate()?;
    let lessons = Lesson::page(state.pool(), limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(lessons.map(LessonResponse::from))))
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/{id}",
    params(
        ("id" = Uuid, Path, description = "ID of the lesson")
    ),
    responses(
        (status = 200, description = "Lesson found", body = LessonResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
pub async fn lesson_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let lesson = find_lesson(&state, id).await?;
    Ok((StatusCode::OK, Json(LessonResponse::from(lesson))))
}

#[utoipa::path(
    put,
    path = "/api/v1/lessons/{id}",
    request_body = LessonCreate,
    params(
        ("id" = Uuid, Path, description = "ID of the lesson")
    ),
    responses(
        (status = 200, description = "Lesson updated successfully", body = LessonResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 422, description = "Invalid title or video URL, or unknown course", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
pub async fn lesson_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LessonCreate>,
) -> WebResult<impl IntoResponse> {
    let found = find_lesson(&state, id).await?;
    let updated = found
        .update(state.pool(), payload)
        .await
        .map_err(|e| WebError::from_database(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(LessonResponse::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/lessons/{id}",
    description = "Deletes the lesson and the progress recorded for it",
    params(
        ("id" = Uuid, Path, description = "ID of the lesson")
    ),
    responses(
        (status = 200, description = "Lesson deleted successfully"),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
pub async fn lesson_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let found = find_lesson(&state, id).await?;
    found
        .delete(state.pool())
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}
