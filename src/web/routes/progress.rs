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
        entity::{Progress, ProgressCreate, ProgressRow, ProgressStatus},
    },
    web::{
        AppState, ErrorResponse, WebError, WebResult, dto::progress::ProgressResponse,
        routes::PaginationQuery,
    },
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ProgressBody {
    /// Must reference a user with the student role
    pub student_id: Uuid,
    pub lesson_id: Uuid,
    /// `not_started` on create when omitted, unchanged on update
    pub status: Option<ProgressStatus>,
}

impl ProgressBody {
    async fn into_create(
        self,
        state: &AppState,
        current: ProgressStatus,
    ) -> WebResult<ProgressCreate> {
        let student = Student::fetch(state.pool(), self.student_id)
            .await
            .map_err(|e| WebError::from_database(Progress::get_resource_type(), e))?;
        Ok(ProgressCreate::new(&student, self.lesson_id).with_status(self.status.unwrap_or(current)))
    }
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(progress_create_handler))
        .route("/page", get(progress_list_handler))
        .route(
            "/{id}",
            get(progress_get_handler)
                .put(progress_update_handler)
                .delete(progress_delete_handler),
        )
        .with_state(state)
}

async fn find_progress(state: &AppState, id: Uuid) -> WebResult<Progress> {
    Progress::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Progress::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Progress::get_resource_type()))
}

async fn find_progress_row(state: &AppState, id: Uuid) -> WebResult<ProgressRow> {
    ProgressRow::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Progress::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Progress::get_resource_type()))
}

#[utoipa::path(
    post,
    path = "/api/v1/progress",
    request_body = ProgressBody,
    responses(
        (status = 201, description = "Progress created successfully", body = ProgressResponse),
        (status = 409, description = "The student already has progress for this lesson", body = ErrorResponse),
        (status = 422, description = "Unknown lesson, or student is not a student", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "progress"
)]
pub async fn progress_create_handler(
    State(state): State<AppState>,
    Json(payload): Json<ProgressBody>,
) -> WebResult<impl IntoResponse> {
    let data = payload.into_create(&state, ProgressStatus::default()).await?;
    let created = Progress::create(state.pool(), data)
        .await
        .map_err(|e| WebError::from_database(Progress::get_resource_type(), e))?;

    let row = find_progress_row(&state, created.id()).await?;
    Ok((StatusCode::CREATED, Json(ProgressResponse::from(row))))
}

#[utoipa::path(
    get,
    path = "/api/v1/progress/page",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<ProgressResponse>),
        (status = 400, description = "Pagination out of range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "progress"
)]
pub async fn progress_list_handler(
    Query(page): Query<PaginationQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let (limit, offset) = page.validate()?;
    let (rows, total) = tokio::try_join!(
        ProgressRow::list(state.pool(), limit, offset),
        Progress::count(state.pool()),
    )
    .map_err(|e| WebError::resource_fetch_error(Progress::get_resource_type(), e))?;

    let page = Page::new(rows, total, limit, offset).map(ProgressResponse::from);
    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/progress/{id}",
    params(
        ("id" = Uuid, Path, description = "ID of the progress row")
    ),
    responses(
        (status = 200, description = "Progress found", body = ProgressResponse),
        (status = 404, description = "Progress not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "progress"
)]
pub async fn progress_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let row = find_progress_row(&state, id).await?;
    Ok((StatusCode::OK, Json(ProgressResponse::from(row))))
}

#[utoipa::path(
    put,
    path = "/api/v1/progress/{id}",
    request_body = ProgressBody,
    params(
        ("id" = Uuid, Path, description = "ID of the progress row")
    ),
    responses(
        (status = 200, description = "Progress updated successfully", body = ProgressResponse),
        (status = 404, description = "Progress not found", body = ErrorResponse),
        (status = 409, description = "The student already has progress for this lesson", body = ErrorResponse),
        (status = 422, description = "Unknown lesson, or student is not a student", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "progress"
)]
pub async fn progress_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProgressBody>,
) -> WebResult<impl IntoResponse> {
    let found = find_progress(&state, id).await?;
    let data = payload.into_create(&state, found.status()).await?;
    found
        .update(state.pool(), data)
        .await
        .map_err(|e| WebError::from_database(Progress::get_resource_type(), e))?;

    let row = find_progress_row(&state, id).await?;
    Ok((StatusCode::OK, Json(ProgressResponse::from(row))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/progress/{id}",
    params(
        ("id" = Uuid, Path, description = "ID of the progress row")
    ),
    responses(
        (status = 200, description = "Progress deleted successfully"),
        (status = 404, description = "Progress not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "progress"
)]
pub async fn progress_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let found = find_progress(&state, id).await?;
    found
        .delete(state.pool())
        .await
        .map_err(|e| WebError::resource_fetch_error(Progress::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}
