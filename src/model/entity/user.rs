use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{UserRole, validate};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserEntity {
    id: uuid::Uuid,
    name: String,
    email: String,
    #[sqlx(try_from = "String")]
    role: UserRole,
}

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserEntityCreateUpdate {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl UserEntityCreateUpdate {
    pub fn validate(&self) -> DatabaseResult<()> {
        validate::required("name", &self.name, validate::USER_NAME_MAX)?;
        validate::email(&self.email)
    }
}

impl ResourceTyped for UserEntity {
    fn get_resource_type() -> crate::model::repo::ResourceType {
        crate::model::repo::ResourceType::User
    }
}

impl UserEntity {
    pub fn new<N: Into<String>, E: Into<String>>(id: Uuid, name: N, email: E, role: UserRole) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    pub fn id(&self) -> uuid::Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> UserRole {
        self.role
    }
}

impl std::fmt::Display for UserEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[async_trait::async_trait]
impl CrudRepository<UserEntity, UserEntityCreateUpdate, uuid::Uuid> for UserEntity {
    async fn create(mm: &ModelManager, data: UserEntityCreateUpdate) -> DatabaseResult<Self> {
        data.validate()?;
        let result = sqlx::query("INSERT INTO users (id, name, email, role) VALUES ($1,$2,$3,$4) RETURNING id")
            .bind(Uuid::new_v4())
            .bind(&data.name)
            .bind(&data.email)
            .bind(data.role.as_str())
            .fetch_one(mm.executor())
            .await?;

        let id = result.try_get("id")?;
        Ok(UserEntity {
            id,
            name: data.name,
            email: data.email,
            role: data.role,
        })
    }

    /// Changing the role of a user that still owns courses (or enrollments,
    /// progress rows) is rejected by the store with a foreign key violation.
    async fn update(mut self, mm: &ModelManager, data: UserEntityCreateUpdate) -> DatabaseResult<Self> {
        data.validate()?;
        sqlx::query("UPDATE users SET name = $1, email = $2, role = $3 WHERE id = $4")
            .bind(&data.name)
            .bind(&data.email)
            .bind(data.role.as_str())
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.name = data.name;
        self.email = data.email;
        self.role = data.role;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: uuid::Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM users ORDER BY name, id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(UserEntity, UserEntityCreateUpdate, Uuid);

impl UserEntity {
    pub async fn find_by_email(mm: &ModelManager, email: &str) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    /// Users eligible for a role-restricted reference, e.g. course instructors.
    pub async fn choices(mm: &ModelManager, role: UserRole) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE role = $1 ORDER BY name, id")
            .bind(role.as_str())
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_is_the_name() {
        let user = UserEntity::new(Uuid::new_v4(), "Grace Hopper", "grace@example.com", UserRole::Instructor);
        assert_eq!(user.to_string(), "Grace Hopper");
    }

    #[test]
    fn create_payload_validation() {
        let mut data = UserEntityCreateUpdate {
            name: "Grace".into(),
            email: "grace@example.com".into(),
            role: UserRole::Student,
        };
        assert!(data.validate().is_ok());

        data.email = "grace".into();
        assert!(data.validate().is_err());

        data.email = "grace@example.com".into();
        data.name = String::new();
        assert!(data.validate().is_err());
    }

    #[test]
    fn serializes_role_as_snake_case() {
        let user = UserEntity::new(Uuid::nil(), "Grace", "grace@example.com", UserRole::Instructor);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "instructor");
        assert_eq!(json["email"], "grace@example.com");
    }
}
