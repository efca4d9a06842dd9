use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, Student, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Enrollment {
    id: Uuid,
    student_id: Uuid,
    course_id: Uuid,
    enrolled_at: DateTime<Utc>,
}

/// Create/update payload. `enrolled_at` is stamped by the store on insert
/// and never written afterwards.
#[derive(Debug, Clone)]
pub struct EnrollmentCreate {
    student_id: Uuid,
    course_id: Uuid,
}

impl EnrollmentCreate {
    pub fn new(student: &Student, course_id: Uuid) -> Self {
        Self {
            student_id: student.id(),
            course_id,
        }
    }
}

impl ResourceTyped for Enrollment {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Enrollment
    }
}

impl Enrollment {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn enrolled_at(&self) -> DateTime<Utc> {
        self.enrolled_at
    }
}

#[async_trait]
impl CrudRepository<Enrollment, EnrollmentCreate, uuid::Uuid> for Enrollment {
    async fn create(mm: &ModelManager, data: EnrollmentCreate) -> DatabaseResult<Self> {
        let result = sqlx::query_as(
            "INSERT INTO enrollments (id, student_id, course_id) VALUES ($1,$2,$3) RETURNING id, student_id, course_id, enrolled_at",
        )
        .bind(Uuid::new_v4())
        .bind(data.student_id)
        .bind(data.course_id)
        .fetch_one(mm.executor())
        .await?;
        Ok(result)
    }

    async fn update(mut self, mm: &ModelManager, data: EnrollmentCreate) -> DatabaseResult<Self> {
        sqlx::query("UPDATE enrollments SET student_id = $1, course_id = $2 WHERE id = $3")
            .bind(data.student_id)
            .bind(data.course_id)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.student_id = data.student_id;
        self.course_id = data.course_id;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: uuid::Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM enrollments WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM enrollments ORDER BY enrolled_at, id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Enrollment, EnrollmentCreate, Uuid);

impl Enrollment {
    pub async fn all_by_student(mm: &ModelManager, student_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM enrollments WHERE student_id = $1 ORDER BY enrolled_at, id")
            .bind(student_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }
}

// Utils

/// Enrollment joined with the names it is listed by.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EnrollmentRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub course_id: Uuid,
    pub course_title: String,
    pub enrolled_at: DateTime<Utc>,
}

const ENROLLMENT_ROW_SELECT: &str = r#"
    SELECT
        e.id,
        e.student_id,
        u.name AS student_name,
        e.course_id,
        c.title AS course_title,
        e.enrolled_at
    FROM enrollments e
    JOIN users u ON u.id = e.student_id
    JOIN courses c ON c.id = e.course_id
"#;

impl EnrollmentRow {
    pub async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let row = sqlx::query_as(&format!("{ENROLLMENT_ROW_SELECT} WHERE e.id = $1"))
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(row)
    }

    pub async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(&format!(
            "{ENROLLMENT_ROW_SELECT} ORDER BY e.enrolled_at, e.id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(rows)
    }

    pub async fn all_by_student(mm: &ModelManager, student_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(&format!(
            "{ENROLLMENT_ROW_SELECT} WHERE e.student_id = $1 ORDER BY e.enrolled_at, e.id"
        ))
        .bind(student_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(rows)
    }
}

impl std::fmt::Display for EnrollmentRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.student_name, self.course_title)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn row_display_joins_student_and_course() {
        let row = EnrollmentRow {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            student_name: "Ada".into(),
            course_id: Uuid::new_v4(),
            course_title: "Rust 101".into(),
            enrolled_at: Utc::now(),
        };
        assert_eq!(row.to_string(), "Ada - Rust 101");
    }
}
