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
        CrudRepository, PaginatableRepository, ResourceTyped, UserRole,
        entity::{UserEntity, UserEntityCreateUpdate},
    },
    web::{
        AppState, ErrorResponse, WebError, WebResult, dto::users::UserResponse,
        routes::PaginationQuery,
    },
};

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChoicesQuery {
    pub role: UserRole,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(user_create_handler))
        .route("/page", get(user_list_handler))
        .route("/choices", get(user_choices_handler))
        .route(
            "/{id}",
            get(user_get_handler)
                .put(user_update_handler)
                .delete(user_delete_handler),
        )
        .with_state(state)
}

async fn find_user(state: &AppState, id: Uuid) -> WebResult<UserEntity> {
    UserEntity::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(UserEntity::get_resource_type()))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserEntityCreateUpdate,
    description = "Creates new user",
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 409, description = "Email is already taken", body = ErrorResponse),
        (status = 422, description = "Invalid name or email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn user_create_handler(
    State(state): State<AppState>,
    Json(payload): Json<UserEntityCreateUpdate>,
) -> WebResult<impl IntoResponse> {
    let created = UserEntity::create(state.pool(), payload)
        .await
        .map_err(|e| WebError::from_database(UserEntity::get_resource_type(), e))?;

    tracing::info!("user {} created as {}", created.id(), created.role());
    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/page",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<UserResponse>),
        (status = 400, description = "Pagination out of range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn user_list_handler(
    Query(page): Query<PaginationQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let (limit, offset) = page.validate()?;
    let users = UserEntity::page(state.pool(), limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(users.map(UserResponse::from))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/choices",
    params(ChoicesQuery),
    description = "Users selectable for a role-restricted reference, e.g. course instructors",
    responses(
        (status = 200, description = "Users with the requested role", body = Vec<UserResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn user_choices_handler(
    Query(query): Query<ChoicesQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let users = UserEntity::choices(state.pool(), query.role)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok((StatusCode::OK, Json(users)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(
        ("id" = Uuid, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn user_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = find_user(&state, id).await?;
    Ok((StatusCode::OK, Json(UserResponse::from(user))))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    request_body = UserEntityCreateUpdate,
    params(
        ("id" = Uuid, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email is already taken", body = ErrorResponse),
        (status = 422, description = "Invalid data, or a role change the user's courses/enrollments forbid", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn user_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserEntityCreateUpdate>,
) -> WebResult<impl IntoResponse> {
    let found = find_user(&state, id).await?;

    let updated = found
        .update(state.pool(), payload)
        .await
        .map_err(|e| WebError::from_database(UserEntity::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(UserResponse::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    description = "Deletes the user along with their courses, enrollments and progress",
    params(
        ("id" = Uuid, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "User deleted successfully"),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn user_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let found = find_user(&state, id).await?;

    found
        .delete(state.pool())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    tracing::info!("user {id} deleted");
    Ok(StatusCode::OK)
}
