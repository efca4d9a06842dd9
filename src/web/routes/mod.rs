use crate::web::{doc::ApiDoc, AppState, WebError, WebResult};
use axum::Router;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod users;
pub mod categories;
pub mod courses;
pub mod lessons;
pub mod enrollments;
pub mod progress;

pub const PAGE_LIMIT_MAX: i64 = 100;

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Page size, 1..=100
    limit: i64,
    offset: i64,
}

impl PaginationQuery {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    /// Returns `(limit, offset)` once both are in range.
    pub fn validate(&self) -> WebResult<(i64, i64)> {
        if !(1..=PAGE_LIMIT_MAX).contains(&self.limit) || self.offset < 0 {
            return Err(WebError::pagination_invalid(self.limit, self.offset));
        }
        Ok((self.limit, self.offset))
    }
}

pub fn build_app<S: Send + Sync + Clone + 'static>(state: AppState, docs: bool) -> Router<S> {
    let mut router = Router::new()
        .nest("/api/v1/users", users::routes(state.clone()))
        .nest("/api/v1/categories", categories::routes(state.clone()))
        .nest("/api/v1/courses", courses::routes(state.clone()))
        .nest("/api/v1/lessons", lessons::routes(state.clone()))
        .nest("/api/v1/enrollments", enrollments::routes(state.clone()))
        .nest("/api/v1/progress", progress::routes(state.clone()))
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    if docs {
        let openapi = ApiDoc::openapi();

        router = router
            .merge(
                SwaggerUi::new("/api/v1/docs")
                    .url("/api-doc/openapi.json", openapi),
            );
    }

    router
}
