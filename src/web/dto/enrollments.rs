use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::EnrollmentRow;

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
    /// `<student name> - <course title>`
    pub label: String,
}

impl From<EnrollmentRow> for EnrollmentResponse {
    fn from(row: EnrollmentRow) -> Self {
        Self {
            label: row.to_string(),
            id: row.id,
            student_id: row.student_id,
            course_id: row.course_id,
            enrolled_at: row.enrolled_at,
        }
    }
}
