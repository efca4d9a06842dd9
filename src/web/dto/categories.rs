use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::Category;

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub label: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            label: category.to_string(),
            id: category.id(),
            name: category.name().to_string(),
        }
    }
}
