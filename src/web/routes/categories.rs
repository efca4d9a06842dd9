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
        entity::{Category, CategoryCreate},
    },
    web::{
        AppState, ErrorResponse, WebError, WebResult, dto::categories::CategoryResponse,
        routes::PaginationQuery,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(category_create_handler))
        .route("/page", get(category_list_handler))
        .route(
            "/{id}",
            get(category_get_handler)
                .put(category_update_handler)
                .delete(category_delete_handler),
        )
        .with_state(state)
}

async fn find_category(state: &AppState, id: Uuid) -> WebResult<Category> {
    Category::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Category::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Category::get_resource_type()))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategoryCreate,
    responses(
        (status = 201, description = "Category created successfully", body = CategoryResponse),
        (status = 422, description = "Invalid name", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "categories"
)]
pub async fn category_create_handler(
    State(state): State<AppState>,
    Json(payload): Json<CategoryCreate>,
) -> WebResult<impl IntoResponse> {
    let created = Category::create(state.pool(), payload)
        .await
        .map_err(|e| WebError::from_database(Category::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/page",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<CategoryResponse>),
        (status = 400, description = "Pagination out of range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "categories"
)]
pub async fn category_list_handler(
    Query(page): Query<PaginationQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let (limit, offset) = page.validate()?;
    let categories = Category::page(state.pool(), limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Category::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(categories.map(CategoryResponse::from))))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "ID of the category")
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "categories"
)]
pub async fn category_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let category = find_category(&state, id).await?;
    Ok((StatusCode::OK, Json(CategoryResponse::from(category))))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    request_body = CategoryCreate,
    params(
        ("id" = Uuid, Path, description = "ID of the category")
    ),
    responses(
        (status = 200, description = "Category updated successfully", body = CategoryResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 422, description = "Invalid name", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "categories"
)]
pub async fn category_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryCreate>,
) -> WebResult<impl IntoResponse> {
    let found = find_category(&state, id).await?;
    let updated = found
        .update(state.pool(), payload)
        .await
        .map_err(|e| WebError::from_database(Category::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(CategoryResponse::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    description = "Deletes the category. Its courses are kept without a category",
    params(
        ("id" = Uuid, Path, description = "ID of the category")
    ),
    responses(
        (status = 200, description = "Category deleted successfully"),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "categories"
)]
pub async fn category_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let found = find_category(&state, id).await?;
    found
        .delete(state.pool())
        .await
        .map_err(|e| WebError::resource_fetch_error(Category::get_resource_type(), e))?;

    tracing::info!("category {id} deleted");
    Ok(StatusCode::OK)
}
