use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::Lesson;

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub video_url: String,
    pub label: String,
}

impl From<Lesson> for LessonResponse {
    fn from(lesson: Lesson) -> Self {
        Self {
            label: lesson.to_string(),
            id: lesson.id(),
            course_id: lesson.course_id(),
            title: lesson.title().to_string(),
            video_url: lesson.video_url().to_string(),
        }
    }
}
