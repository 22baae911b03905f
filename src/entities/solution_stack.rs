use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_STATUS: &str = "Active";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "solution_stacks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    pub status: String,
    pub owner: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// A new stack in the `Active` status, with a slug derived from its name.
    pub fn new_stack(name: &str, description: &str, category: &str, owner: &str) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            slug: Set(slugify(name)),
            description: Set(description.to_string()),
            category: Set(category.to_string()),
            status: Set(DEFAULT_STATUS.to_string()),
            owner: Set(owner.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}
