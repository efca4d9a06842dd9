use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::{
    error::log_error,
    model::{DatabaseError, ResourceType},
};

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("RequestPaginationInvalid, limit: {limit}, offset: {offset}")]
    RequestPaginationInvalid { limit: i64, offset: i64 },
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("ResourceNotFound: {resource_type:?}")]
    ResourceNotFound { resource_type: ResourceType },

    #[error("ResourceConflict: {resource_type:?}. Error: {error}")]
    ResourceConflict {
        resource_type: ResourceType,
        error: DatabaseError,
    },

    #[error("ResourceUnprocessable: {resource_type:?}. Error: {error}")]
    ResourceUnprocessable {
        resource_type: ResourceType,
        error: DatabaseError,
    },

    #[error("ResourceFetchError: {resource_type:?}. Error: {error}")]
    ResourceFetchError {
        resource_type: ResourceType,
        error: DatabaseError,
    },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RequestPaginationInvalid { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::RequestPaginationInvalid { .. } => format!(
                "Request error, limit must be between 1 and {} and offset must not be negative.",
                crate::web::routes::PAGE_LIMIT_MAX
            ),
        }
    }
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ResourceConflict { .. } => StatusCode::CONFLICT,
            Self::ResourceUnprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ResourceFetchError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceNotFound { .. } => String::from("Resource error, resource not found."),
            Self::ResourceConflict { .. } => {
                String::from("Resource error, resource conflicts with an existing one.")
            }
            Self::ResourceUnprocessable { error, .. } => match error {
                DatabaseError::Validation(_) | DatabaseError::RoleMismatch { .. } => {
                    format!("Resource error, invalid data: {error}.")
                }
                _ => String::from(
                    "Resource error, invalid data: a referenced resource is missing or has the wrong role.",
                ),
            },
            Self::ResourceFetchError { .. } => {
                String::from("Resource error, unable to fetch resource.")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("ResourceError - {0}")]
    ResourceError(#[from] ResourceError),
    #[error("RequestError - {0}")]
    RequestError(#[from] RequestError),
}

impl WebError {
    pub fn resource_not_found(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceNotFound {
            resource_type: r#type,
        })
    }

    pub fn resource_fetch_error(r#type: ResourceType, error: DatabaseError) -> Self {
        Self::ResourceError(ResourceError::ResourceFetchError {
            resource_type: r#type,
            error,
        })
    }

    /// Sorts a storage error into conflict, invalid input or plain failure.
    pub fn from_database(r#type: ResourceType, error: DatabaseError) -> Self {
        let resource_type = r#type;
        let e = if error.is_unique_violation() {
            ResourceError::ResourceConflict {
                resource_type,
                error,
            }
        } else if error.is_rejected_input() {
            ResourceError::ResourceUnprocessable {
                resource_type,
                error,
            }
        } else {
            ResourceError::ResourceFetchError {
                resource_type,
                error,
            }
        };
        Self::ResourceError(e)
    }

    pub fn pagination_invalid(limit: i64, offset: i64) -> Self {
        Self::RequestError(RequestError::RequestPaginationInvalid { limit, offset })
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            Self::ResourceError(e) => e.status_code(),
            Self::RequestError(e) => e.status_code(),
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceError(e) => e.client_display(),
            Self::RequestError(e) => e.client_display(),
        }
    }
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message for the client
    pub message: String,
    /// HTTP status code (stringified)
    pub status_code: String,
    /// Optional debug details (only in debug mode)
    pub details: Option<String>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        log_error(&self);

        let status_code = self.status_code();
        let display = self.client_display();

        let body = ErrorResponse {
            message: display,
            status_code: status_code.as_str().to_string(),
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        };

        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::UserRole;

    #[test]
    fn validation_maps_to_unprocessable() {
        let err = WebError::from_database(
            ResourceType::User,
            DatabaseError::validation("email `x` is not a valid address"),
        );
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.client_display().contains("email `x` is not a valid address"));
    }

    #[test]
    fn role_mismatch_maps_to_unprocessable() {
        let err = WebError::from_database(
            ResourceType::Course,
            DatabaseError::RoleMismatch {
                expected: UserRole::Instructor,
                actual: UserRole::Student,
            },
        );
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.client_display().contains("expected instructor"));
    }

    #[test]
    fn other_store_errors_are_internal() {
        let err = WebError::from_database(
            ResourceType::Lesson,
            DatabaseError::from(sqlx::Error::PoolTimedOut),
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.client_display(),
            "Resource error, unable to fetch resource."
        );
    }

    #[test]
    fn not_found_and_pagination() {
        assert_eq!(
            WebError::resource_not_found(ResourceType::Category).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WebError::pagination_invalid(0, 0).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
