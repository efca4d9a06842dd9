use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{Instructor, ModelManager, error::DatabaseResult, repo::CrudRepository, validate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Course {
    id: Uuid,
    title: String,
    description: String,
    instructor_id: Uuid,
    category_id: Option<Uuid>,
}

/// Create/update payload. The instructor can only be supplied as a checked
/// [`Instructor`], so a student can never end up owning a course.
#[derive(Debug, Clone)]
pub struct CourseCreate {
    title: String,
    description: String,
    instructor_id: Uuid,
    category_id: Option<Uuid>,
}

impl CourseCreate {
    pub fn new<T: Into<String>, D: Into<String>>(
        title: T,
        description: D,
        instructor: &Instructor,
        category_id: Option<Uuid>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            instructor_id: instructor.id(),
            category_id,
        }
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        validate::required("title", &self.title, validate::TITLE_MAX)
    }
}

impl ResourceTyped for Course {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Course
    }
}

impl Course {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn instructor_id(&self) -> Uuid {
        self.instructor_id
    }

    pub fn category_id(&self) -> Option<Uuid> {
        self.category_id
    }
}

impl std::fmt::Display for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

#[async_trait]
impl CrudRepository<Course, CourseCreate, uuid::Uuid> for Course {
    async fn create(mm: &ModelManager, data: CourseCreate) -> DatabaseResult<Self> {
        data.validate()?;
        let result = sqlx::query("INSERT INTO courses (id, title, description, instructor_id, category_id) VALUES ($1,$2,$3,$4,$5) RETURNING id")
            .bind(Uuid::new_v4())
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.instructor_id)
            .bind(data.category_id)
            .fetch_one(mm.executor())
            .await?;

        let id = result.try_get("id")?;
        Ok(Course {
            id,
            title: data.title,
            description: data.description,
            instructor_id: data.instructor_id,
            category_id: data.category_id,
        })
    }

    async fn update(mut self, mm: &ModelManager, data: CourseCreate) -> DatabaseResult<Self> {
        data.validate()?;
        sqlx::query("UPDATE courses SET title = $1, description = $2, instructor_id = $3, category_id = $4 WHERE id = $5")
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.instructor_id)
            .bind(data.category_id)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.title = data.title;
        self.description = data.description;
        self.instructor_id = data.instructor_id;
        self.category_id = data.category_id;
        Ok(self)
    }

    /// Lessons and enrollments of the course go with it.
    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: uuid::Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses ORDER BY title, id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl Course {
    pub async fn all_by_instructor(mm: &ModelManager, instructor_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE instructor_id = $1 ORDER BY title, id")
            .bind(instructor_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn all_by_category(mm: &ModelManager, category_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE category_id = $1 ORDER BY title, id")
            .bind(category_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn find_by_title(mm: &ModelManager, title: &str) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE title = $1 ORDER BY id LIMIT 1")
            .bind(title)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

impl_paginatable_for!(Course, CourseCreate, Uuid);
