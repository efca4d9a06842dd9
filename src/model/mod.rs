mod database;
pub use database::DbConnection;

pub mod entity;

mod error;
pub use error::{DatabaseError, DatabaseResult, UnknownVariant};

mod repo;
pub use repo::{CrudRepository, Page, PaginatableRepository, ResourceType, ResourceTyped};

mod role;
pub use role::{Instructor, Student, UserRole};

pub mod validate;

use sqlx::PgPool;

/// Explicit storage handle, every persistence call receives one.
#[derive(Debug, Clone)]
pub struct ModelManager {
    database: DbConnection,
}

impl ModelManager {
    pub fn new(conn: DbConnection) -> Self {
        Self { database: conn }
    }

    pub fn executor(&self) -> &PgPool {
        self.database.pool()
    }

    pub fn database(&self) -> &DbConnection {
        &self.database
    }
}
