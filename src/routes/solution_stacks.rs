use axum::{
    extract::{Path, RawQuery, State},
    http::HeaderMap,
    response::Json,
};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::solution_stack::SolutionStackResponse;
use crate::pagination::{PaginatedRequest, PaginatedResponse};
use crate::services::solution_stacks::{
    GetAllSolutionStacks, GetAllSolutionStacksHandler, GetSolutionStackById,
    GetSolutionStackByIdHandler,
};
use crate::services::QueryHandler;
use crate::utils::pagination_headers::{pagination_headers, RequestUrl};

#[utoipa::path(
    get,
    path = "/api/solution-stacks",
    params(
        PaginatedRequest,
        ("searchTerm" = Option<String>, Query, description = "Case-insensitive substring match on name or description")
    ),
    responses(
        (status = 200, description = "One page of solution stacks", body = PaginatedResponse<SolutionStackResponse>,
            headers(
                ("X-Pagination" = String, description = "Paging metadata as JSON"),
                ("Link" = String, description = "RFC 5988 first/prev/next/last links, omitted when there is a single page")
            )
        ),
        (status = 500, description = "Internal server error")
    ),
    tag = "Solution Stacks"
)]
pub async fn list_solution_stacks(
    State(db): State<DatabaseConnection>,
    request_url: RequestUrl,
    RawQuery(raw_query): RawQuery,
) -> Result<(HeaderMap, Json<PaginatedResponse<SolutionStackResponse>>), AppError> {
    let query = GetAllSolutionStacks::from_query(raw_query.as_deref());
    tracing::info!(
        page_number = ?query.page.page_number,
        page_size = ?query.page.page_size,
        sort_by = ?query.page.sort_by,
        search_term = ?query.search_term,
        "List solution stacks request"
    );

    let page = GetAllSolutionStacksHandler::new(db).handle(query).await?;
    let headers = pagination_headers(&page, &request_url);

    Ok((headers, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/solution-stacks/{id}",
    params(
        ("id" = String, Path, description = "Solution stack id (UUID)")
    ),
    responses(
        (status = 200, description = "Solution stack found", body = SolutionStackResponse),
        (status = 404, description = "No solution stack with this id"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Solution Stacks"
)]
pub async fn get_solution_stack(
    State(db): State<DatabaseConnection>,
    Path(id): Path<String>,
) -> Result<Json<SolutionStackResponse>, AppError> {
    // A malformed id can never match a row.
    let Ok(id) = Uuid::parse_str(&id) else {
        tracing::debug!(%id, "Solution stack id is not a UUID");
        return Err(AppError::NotFound);
    };

    let stack = GetSolutionStackByIdHandler::new(db)
        .handle(GetSolutionStackById(id))
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(stack))
}
