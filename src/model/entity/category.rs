use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository, validate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Category {
    id: Uuid,
    name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CategoryCreate {
    pub name: String,
}

impl ResourceTyped for Category {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Category
    }
}

impl Category {
    pub fn new<S: Into<String>>(id: Uuid, name: S) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[async_trait]
impl CrudRepository<Category, CategoryCreate, uuid::Uuid> for Category {
    async fn create(mm: &ModelManager, data: CategoryCreate) -> DatabaseResult<Self> {
        validate::required("name", &data.name, validate::CATEGORY_NAME_MAX)?;
        let result = sqlx::query("INSERT INTO categories (id, name) VALUES ($1,$2) RETURNING id")
            .bind(Uuid::new_v4())
            .bind(&data.name)
            .fetch_one(mm.executor())
            .await?;

        let id = result.try_get("id")?;
        Ok(Category {
            id,
            name: data.name,
        })
    }

    async fn update(mut self, mm: &ModelManager, data: CategoryCreate) -> DatabaseResult<Self> {
        validate::required("name", &data.name, validate::CATEGORY_NAME_MAX)?;
        sqlx::query("UPDATE categories SET name = $1 WHERE id = $2")
            .bind(&data.name)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.name = data.name;
        Ok(self)
    }

    /// Courses of this category keep existing, detached from it.
    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: uuid::Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM categories ORDER BY name, id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl Category {
    pub async fn find_by_name(mm: &ModelManager, name: &str) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM categories WHERE name = $1 ORDER BY id LIMIT 1")
            .bind(name)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

impl_paginatable_for!(Category, CategoryCreate, Uuid);
