use utoipa::OpenApi;

use crate::web::routes::{categories, courses, enrollments, lessons, progress, users};

#[derive(OpenApi)]
#[openapi(
    info(title = "learnhub admin API"),
    paths(
        users::user_create_handler,
        users::user_list_handler,
        users::user_choices_handler,
        users::user_get_handler,
        users::user_update_handler,
        users::user_delete_handler,
        categories::category_create_handler,
        categories::category_list_handler,
        categories::category_get_handler,
        categories::category_update_handler,
        categories::category_delete_handler,
        courses::course_create_handler,
        courses::course_list_handler,
        courses::course_get_handler,
        courses::course_update_handler,
        courses::course_delete_handler,
        courses::course_lessons_handler,
        lessons::lesson_create_handler,
        lessons::lesson_list_handler,
        lessons::lesson_get_handler,
        lessons::lesson_update_handler,
        lessons::lesson_delete_handler,
        enrollments::enrollment_create_handler,
        enrollments::enrollment_list_handler,
        enrollments::enrollment_get_handler,
        enrollments::enrollment_update_handler,
        enrollments::enrollment_delete_handler,
        progress::progress_create_handler,
        progress::progress_list_handler,
        progress::progress_get_handler,
        progress::progress_update_handler,
        progress::progress_delete_handler,
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn openapi_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/users",
            "/api/v1/users/choices",
            "/api/v1/categories/{id}",
            "/api/v1/courses/{id}/lessons",
            "/api/v1/lessons/page",
            "/api/v1/enrollments",
            "/api/v1/progress/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
