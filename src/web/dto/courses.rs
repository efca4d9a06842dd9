use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::Course;

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub instructor_id: Uuid,
    /// Empty once the category is deleted
    pub category_id: Option<Uuid>,
    pub label: String,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            label: course.to_string(),
            id: course.id(),
            title: course.title().to_string(),
            description: course.description().to_string(),
            instructor_id: course.instructor_id(),
            category_id: course.category_id(),
        }
    }
}
