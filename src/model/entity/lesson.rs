use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository, validate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Lesson {
    id: Uuid,
    course_id: Uuid,
    title: String,
    video_url: String,
}

impl ResourceTyped for Lesson {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Lesson
    }
}

impl Lesson {
    pub fn id(&self) -> uuid::Uuid {
        self.id
    }

    pub fn course_id(&self) -> uuid::Uuid {
        self.course_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }
}

impl std::fmt::Display for Lesson {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LessonCreate {
    pub course_id: Uuid,
    pub title: String,
    pub video_url: String,
}

impl LessonCreate {
    pub fn validate(&self) -> DatabaseResult<()> {
        validate::required("title", &self.title, validate::TITLE_MAX)?;
        validate::video_url(&self.video_url)
    }
}

#[async_trait]
impl CrudRepository<Lesson, LessonCreate, uuid::Uuid> for Lesson {
    async fn create(mm: &ModelManager, data: LessonCreate) -> DatabaseResult<Self> {
        data.validate()?;
        let result = sqlx::query("INSERT INTO lessons (id, course_id, title, video_url) VALUES ($1,$2,$3,$4) RETURNING id")
            .bind(Uuid::new_v4())
            .bind(data.course_id)
            .bind(&data.title)
            .bind(&data.video_url)
            .fetch_one(mm.executor())
            .await?;

        let id = result.try_get("id")?;
        Ok(Lesson {
            id,
            course_id: data.course_id,
            title: data.title,
            video_url: data.video_url,
        })
    }

    async fn update(mut self, mm: &ModelManager, data: LessonCreate) -> DatabaseResult<Self> {
        data.validate()?;
        sqlx::query("UPDATE lessons SET course_id = $1, title = $2, video_url = $3 WHERE id = $4")
            .bind(data.course_id)
            .bind(&data.title)
            .bind(&data.video_url)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.course_id = data.course_id;
        self.title = data.title;
        self.video_url = data.video_url;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: uuid::Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons ORDER BY title, id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl Lesson {
    pub async fn all_by_course(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons WHERE course_id = $1 ORDER BY title, id")
            .bind(course_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn find_by_title(
        mm: &ModelManager,
        course_id: Uuid,
        title: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons WHERE course_id = $1 AND title = $2 ORDER BY id LIMIT 1")
            .bind(course_id)
            .bind(title)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

impl_paginatable_for!(Lesson, LessonCreate, Uuid);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn payload_requires_http_video_url() {
        let mut data = LessonCreate {
            course_id: Uuid::new_v4(),
            title: "Ownership".into(),
            video_url: "https://videos.example.com/ownership".into(),
        };
        assert!(data.validate().is_ok());

        data.video_url = "ownership.mp4".into();
        assert!(data.validate().is_err());
    }
}
