use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    Condition, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Select,
};
use serde::de::value::{Error as ValueError, MapDeserializer};
use serde::Deserialize;
use url::form_urlencoded;
use uuid::Uuid;

use crate::entities::solution_stack::{self, Entity as SolutionStack};
use crate::error::AppError;
use crate::models::solution_stack::SolutionStackResponse;
use crate::pagination::{paginate_select, PaginatedRequest, PaginatedResponse};
use crate::services::QueryHandler;

const LIKE_ESCAPE: char = '!';

const QUERY_KEYS: &[&str] = &["pageNumber", "pageSize", "sortBy", "sortDescending", "searchTerm"];

/// Query string of `GET /api/solution-stacks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAllSolutionStacks {
    #[serde(flatten)]
    pub page: PaginatedRequest,
    #[serde(default)]
    pub search_term: Option<String>,
}

impl GetAllSolutionStacks {
    /// Binds a raw query string. Keys match case-insensitively and the first
    /// occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut pairs: Vec<(String, String)> = Vec::new();

        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let Some(known) = QUERY_KEYS.iter().find(|k| k.eq_ignore_ascii_case(&key)) else {
                continue;
            };
            if pairs.iter().any(|(k, _)| k == known) {
                continue;
            }
            pairs.push((known.to_string(), value.into_owned()));
        }

        let deserializer = MapDeserializer::<_, ValueError>::new(pairs.into_iter());
        match Self::deserialize(deserializer) {
            Ok(query) => query,
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable list query, using defaults");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetSolutionStackById(pub Uuid);

/// Columns a client may sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Category,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" => Some(SortField::Name),
            "category" => Some(SortField::Category),
            "createdat" | "created_at" => Some(SortField::CreatedAt),
            "updatedat" | "updated_at" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    fn column(self) -> solution_stack::Column {
        match self {
            SortField::Name => solution_stack::Column::Name,
            SortField::Category => solution_stack::Column::Category,
            SortField::CreatedAt => solution_stack::Column::CreatedAt,
            SortField::UpdatedAt => solution_stack::Column::UpdatedAt,
        }
    }

    /// Orders by the requested field, or by name ascending when the field is
    /// unknown or absent. Ties are broken by id so paging is stable.
    pub fn apply(
        select: Select<SolutionStack>,
        sort_by: Option<&str>,
        descending: bool,
    ) -> Select<SolutionStack> {
        let (column, order) = match sort_by.and_then(SortField::parse) {
            Some(field) if descending => (field.column(), Order::Desc),
            Some(field) => (field.column(), Order::Asc),
            None => (solution_stack::Column::Name, Order::Asc),
        };

        select
            .order_by(column, order)
            .order_by(solution_stack::Column::Id, Order::Asc)
    }
}

/// Case-insensitive substring match on name or description.
///
/// Blank terms yield no condition at all. The term is folded the way the
/// backend's `LOWER` folds the columns: SQLite only lowercases ASCII.
pub fn search_condition(term: &str, backend: DbBackend) -> Option<Condition> {
    if term.trim().is_empty() {
        return None;
    }

    let folded = match backend {
        DbBackend::Sqlite => term.to_ascii_lowercase(),
        _ => term.to_lowercase(),
    };
    let pattern = format!("%{}%", escape_like(&folded));
    let contains = |column: solution_stack::Column| {
        Expr::expr(Func::lower(Expr::col((SolutionStack, column))))
            .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE))
    };

    Some(
        Condition::any()
            .add(contains(solution_stack::Column::Name))
            .add(contains(solution_stack::Column::Description)),
    )
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Clone)]
pub struct GetAllSolutionStacksHandler {
    db: DatabaseConnection,
}

impl GetAllSolutionStacksHandler {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl QueryHandler<GetAllSolutionStacks> for GetAllSolutionStacksHandler {
    type Output = PaginatedResponse<SolutionStackResponse>;

    async fn handle(&self, query: GetAllSolutionStacks) -> Result<Self::Output, AppError> {
        let mut select = SolutionStack::find();
        let backend = self.db.get_database_backend();
        if let Some(condition) = query
            .search_term
            .as_deref()
            .and_then(|term| search_condition(term, backend))
        {
            select = select.filter(condition);
        }

        let total_count = select.clone().count(&self.db).await?;

        let select = SortField::apply(
            select,
            query.page.sort_by.as_deref(),
            query.page.sort_descending,
        );

        let response = paginate_select(
            select,
            &self.db,
            &query.page,
            total_count,
            SolutionStackResponse::from,
        )
        .await?;

        tracing::debug!(
            total_count = response.total_count,
            page_number = response.page_number,
            page_size = response.page_size,
            returned = response.items.len(),
            "Listed solution stacks"
        );

        Ok(response)
    }
}

#[derive(Clone)]
pub struct GetSolutionStackByIdHandler {
    db: DatabaseConnection,
}

impl GetSolutionStackByIdHandler {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl QueryHandler<GetSolutionStackById> for GetSolutionStackByIdHandler {
    /// `None` when no stack has the id.
    type Output = Option<SolutionStackResponse>;

    async fn handle(&self, query: GetSolutionStackById) -> Result<Self::Output, AppError> {
        let GetSolutionStackById(id) = query;

        let stack = SolutionStack::find_by_id(id).one(&self.db).await?;

        Ok(stack.map(SolutionStackResponse::from))
    }
}
