use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::solution_stack;

/// Public shape of a solution stack, for both list items and single lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolutionStackResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<solution_stack::Model> for SolutionStackResponse {
    fn from(stack: solution_stack::Model) -> Self {
        SolutionStackResponse {
            id: stack.id,
            name: stack.name,
            slug: stack.slug,
            description: stack.description,
            category: stack.category,
            status: stack.status,
            owner: stack.owner,
            created_at: stack.created_at,
            updated_at: stack.updated_at,
        }
    }
}
