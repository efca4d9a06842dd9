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
        CrudRepository, Page, ResourceTyped, Student,
        entity::{Enrollment, EnrollmentCreate, EnrollmentRow},
    },
    web::{
        AppState, ErrorResponse, WebError, WebResult, dto::enrollments::EnrollmentResponse,
        routes::PaginationQuery,
    },
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct EnrollmentBody {
    /// Must reference a user with the student role
    pub student_id: Uuid,
    pub course_id: Uuid,
}

impl EnrollmentBody {
    async fn into_create(self, state: &AppState) -> WebResult<EnrollmentCreate> {
        let student = Student::fetch(state.pool(), self.student_id)
            .await
            .map_err(|e| WebError::from_database(Enrollment::get_resource_type(), e))?;
        Ok(EnrollmentCreate::new(&student, self.course_id))
    }
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(enrollment_create_handler))
        .route("/page", get(enrollment_list_handler))
        .route(
            "/{id}",
            get(enrollment_get_handler)
                .put(enrollment_update_handler)
                .delete(enrollment_delete_handler),
        )
        .with_state(state)
}

async fn find_enrollment(state: &AppState, id: Uuid) -> WebResult<Enrollment> {
    Enrollment::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Enrollment::get_resource_type()))
}

async fn find_enrollment_row(state: &AppState, id: Uuid) -> WebResult<EnrollmentRow> {
    EnrollmentRow::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Enrollment::get_resource_type()))
}

#[utoipa::path(
    post,
    path = "/api/v1/enrollments",
    request_body = EnrollmentBody,
    description = "Enrolls a student in a course. The enrollment time is set by the server",
    responses(
        (status = 201, description = "Enrollment created successfully", body = EnrollmentResponse),
        (status = 422, description = "Unknown course, or student is not a student", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "enrollments"
)]
pub async fn enrollment_create_handler(
    State(state): State<AppState>,
    Json(payload): Json<EnrollmentBody>,
) -> WebResult<impl IntoResponse> {
    let data = payload.into_create(&state).await?;
    let created = Enrollment::create(state.pool(), data)
        .await
        .map_err(|e| WebError::from_database(Enrollment::get_resource_type(), e))?;

    tracing::info!(
        "student {} enrolled in course {}",
        created.student_id(),
        created.course_id()
    );
    let row = find_enrollment_row(&state, created.id()).await?;
    Ok((StatusCode::CREATED, Json(EnrollmentResponse::from(row))))
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments/page",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<EnrollmentResponse>),
        (status = 400, description = "Pagination out of range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "enrollments"
)]
pub async fn enrollment_list_handler(
    Query(page): Query<PaginationQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let (limit, offset) = page.validate()?;
    let (rows, total) = tokio::try_join!(
        EnrollmentRow::list(state.pool(), limit, offset),
        Enrollment::count(state.pool()),
    )
    .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;

    let page = Page::new(rows, total, limit, offset).map(EnrollmentResponse::from);
    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments/{id}",
    params(
        ("id" = Uuid, Path, description = "ID of the enrollment")
    ),
    responses(
        (status = 200, description = "Enrollment found", body = EnrollmentResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "enrollments"
)]
pub async fn enrollment_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let row = find_enrollment_row(&state, id).await?;
    Ok((StatusCode::OK, Json(EnrollmentResponse::from(row))))
}

#[utoipa::path(
    put,
    path = "/api/v1/enrollments/{id}",
    request_body = EnrollmentBody,
    description = "Moves the enrollment to another student or course. The enrollment time is kept",
    params(
        ("id" = Uuid, Path, description = "ID of the enrollment")
    ),
    responses(
        (status = 200, description = "Enrollment updated successfully", body = EnrollmentResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse),
        (status = 422, description = "Unknown course, or student is not a student", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "enrollments"
)]
pub async fn enrollment_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EnrollmentBody>,
) -> WebResult<impl IntoResponse> {
    let found = find_enrollment(&state, id).await?;
    let data = payload.into_create(&state).await?;
    found
        .update(state.pool(), data)
        .await
        .map_err(|e| WebError::from_database(Enrollment::get_resource_type(), e))?;

    let row = find_enrollment_row(&state, id).await?;
    Ok((StatusCode::OK, Json(EnrollmentResponse::from(row))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/enrollments/{id}",
    params(
        ("id" = Uuid, Path, description = "ID of the enrollment")
    ),
    responses(
        (status = 200, description = "Enrollment deleted successfully"),
        (status = 404, description = "Enrollment not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "enrollments"
)]
pub async fn enrollment_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let found = find_enrollment(&state, id).await?;
    found
        .delete(state.pool())
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}
