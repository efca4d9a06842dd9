use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::{ProgressRow, ProgressStatus};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProgressResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub lesson_id: Uuid,
    pub status: ProgressStatus,
    /// `<student name> - <lesson title>: <status>`
    pub label: String,
}

impl From<ProgressRow> for ProgressResponse {
    fn from(row: ProgressRow) -> Self {
        Self {
            label: row.to_string(),
            id: row.id,
            student_id: row.student_id,
            lesson_id: row.lesson_id,
            status: row.status,
        }
    }
}
