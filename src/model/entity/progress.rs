use std::str::FromStr;

use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, Student, UnknownVariant, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl ProgressStatus {
    /// Column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Listing label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for ProgressStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownVariant::new("progress status", other)),
        }
    }
}

impl TryFrom<String> for ProgressStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Progress {
    id: Uuid,
    student_id: Uuid,
    lesson_id: Uuid,
    #[sqlx(try_from = "String")]
    status: ProgressStatus,
}

impl ResourceTyped for Progress {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Progress
    }
}

impl Progress {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn status(&self) -> ProgressStatus {
        self.status
    }
}

#[derive(Debug, Clone)]
pub struct ProgressCreate {
    student_id: Uuid,
    lesson_id: Uuid,
    status: ProgressStatus,
}

impl ProgressCreate {
    /// Starts out as [`ProgressStatus::NotStarted`].
    pub fn new(student: &Student, lesson_id: Uuid) -> Self {
        Self {
            student_id: student.id(),
            lesson_id,
            status: ProgressStatus::default(),
        }
    }

    pub fn with_status(mut self, status: ProgressStatus) -> Self {
        self.status = status;
        self
    }
}

const PROGRESS_COLUMNS: &str = "id, student_id, lesson_id, status";

#[async_trait]
impl CrudRepository<Progress, ProgressCreate, uuid::Uuid> for Progress {
    /// Fails with a unique violation when the student already has a row for
    /// this lesson.
    async fn create(mm: &ModelManager, data: ProgressCreate) -> DatabaseResult<Self> {
        let result = sqlx::query_as(&format!(
            "INSERT INTO progress (id, student_id, lesson_id, status) VALUES ($1,$2,$3,$4) RETURNING {PROGRESS_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(data.student_id)
        .bind(data.lesson_id)
        .bind(data.status.as_str())
        .fetch_one(mm.executor())
        .await?;
        Ok(result)
    }

    async fn update(mut self, mm: &ModelManager, data: ProgressCreate) -> DatabaseResult<Self> {
        sqlx::query(
            "UPDATE progress SET student_id = $1, lesson_id = $2, status = $3 WHERE id = $4",
        )
        .bind(data.student_id)
        .bind(data.lesson_id)
        .bind(data.status.as_str())
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.student_id = data.student_id;
        self.lesson_id = data.lesson_id;
        self.status = data.status;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM progress WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: uuid::Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(&format!("SELECT {PROGRESS_COLUMNS} FROM progress WHERE id = $1"))
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress ORDER BY student_id, lesson_id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM progress")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Progress, ProgressCreate, Uuid);

impl Progress {
    pub async fn find_by_student_and_lesson(
        mm: &ModelManager,
        student_id: Uuid,
        lesson_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress WHERE student_id = $1 AND lesson_id = $2"
        ))
        .bind(student_id)
        .bind(lesson_id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }

    /// Inserts the row for (student, lesson) or moves the existing one to
    /// `status`.
    pub async fn set_status(
        mm: &ModelManager,
        student: &Student,
        lesson_id: Uuid,
        status: ProgressStatus,
    ) -> DatabaseResult<Self> {
        let result = sqlx::query_as(&format!(
            r#"
            INSERT INTO progress (id, student_id, lesson_id, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (student_id, lesson_id)
            DO UPDATE SET status = EXCLUDED.status
            RETURNING {PROGRESS_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(student.id())
        .bind(lesson_id)
        .bind(status.as_str())
        .fetch_one(mm.executor())
        .await?;
        Ok(result)
    }
}

// Utils

/// Progress joined with the names it is listed by.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProgressRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub lesson_id: Uuid,
    pub lesson_title: String,
    #[sqlx(try_from = "String")]
    pub status: ProgressStatus,
}

const PROGRESS_ROW_SELECT: &str = r#"
    SELECT
        p.id,
        p.student_id,
        u.name AS student_name,
        p.lesson_id,
        l.title AS lesson_title,
        p.status
    FROM progress p
    JOIN users u ON u.id = p.student_id
    JOIN lessons l ON l.id = p.lesson_id
"#;

impl ProgressRow {
    pub async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let row = sqlx::query_as(&format!("{PROGRESS_ROW_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(row)
    }

    pub async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(&format!(
            "{PROGRESS_ROW_SELECT} ORDER BY u.name, l.title, p.id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(rows)
    }
}

impl std::fmt::Display for ProgressRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}: {}", self.student_name, self.lesson_title, self.status)
    }
}
