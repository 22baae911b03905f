use std::str::FromStr;

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, QuerySelect, Select};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_NUMBER: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Raw paging and sorting input as sent by the client.
///
/// Nothing here is validated on the way in: garbage values deserialize to
/// `None`/`false` and the `effective_*` accessors clamp whatever is left.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaginatedRequest {
    /// 1-based page number, values below 1 read as 1
    #[serde(default, deserialize_with = "lenient")]
    #[param(default = 1, minimum = 1)]
    pub page_number: Option<i64>,
    /// Items per page, values below 1 read as the default
    #[serde(default, deserialize_with = "lenient")]
    #[param(default = 20, maximum = 100)]
    pub page_size: Option<i64>,
    /// name, category, createdAt or updatedAt; anything else sorts by name
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    #[param(default = false)]
    pub sort_descending: bool,
}

impl PaginatedRequest {
    pub fn new(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number: Some(page_number),
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    pub fn effective_page_number(&self) -> u64 {
        match self.page_number {
            Some(n) if n > 1 => n as u64,
            _ => DEFAULT_PAGE_NUMBER,
        }
    }

    /// Non-positive sizes reset to the default, they are not clamped to 1.
    pub fn effective_page_size(&self) -> u64 {
        match self.page_size {
            Some(n) if n <= 0 => DEFAULT_PAGE_SIZE,
            Some(n) => (n as u64).min(MAX_PAGE_SIZE),
            None => DEFAULT_PAGE_SIZE,
        }
    }

    /// Capped at `i64::MAX` so the offset always binds as a signed SQL integer.
    pub fn skip(&self) -> u64 {
        (self.effective_page_number() - 1)
            .saturating_mul(self.effective_page_size())
            .min(i64::MAX as u64)
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"))
        .unwrap_or(false))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub page_number: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, page_number: u64, page_size: u64, total_count: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_count.div_ceil(page_size)
        };

        Self {
            items,
            page_number,
            page_size,
            total_count,
            total_pages,
            has_previous_page: page_number > 1,
            has_next_page: page_number < total_pages,
        }
    }

    pub fn metadata(&self) -> PaginationMetadata {
        PaginationMetadata {
            total_count: self.total_count,
            page_size: self.page_size,
            page_number: self.page_number,
            total_pages: self.total_pages,
            has_next_page: self.has_next_page,
            has_previous_page: self.has_previous_page,
        }
    }
}

/// The envelope without its items, as sent in the `X-Pagination` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: u64,
    pub page_size: u64,
    pub page_number: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Runs the page of an already filtered and ordered select and projects each row.
///
/// `total_count` must be counted on the same filtered select before it was
/// ordered or paged.
pub async fn paginate_select<E, C, T, F>(
    select: Select<E>,
    db: &C,
    request: &PaginatedRequest,
    total_count: u64,
    project: F,
) -> Result<PaginatedResponse<T>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
    F: FnMut(E::Model) -> T,
{
    let page_number = request.effective_page_number();
    let page_size = request.effective_page_size();

    let rows = select
        .offset(request.skip())
        .limit(page_size)
        .all(db)
        .await?;

    Ok(PaginatedResponse::new(
        rows.into_iter().map(project).collect(),
        page_number,
        page_size,
        total_count,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    fn parse(query: &str) -> PaginatedRequest {
        let uri: Uri = format!("/items?{query}").parse().unwrap();
        Query::<PaginatedRequest>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn non_positive_page_number_becomes_first_page() {
        for n in [-10, -1, 0, 1] {
            assert_eq!(PaginatedRequest::new(n, 20).effective_page_number(), 1);
        }
        assert_eq!(PaginatedRequest::new(7, 20).effective_page_number(), 7);
    }

    #[test]
    fn page_size_is_clamped_or_reset() {
        assert_eq!(PaginatedRequest::new(1, 0).effective_page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(PaginatedRequest::new(1, -5).effective_page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(PaginatedRequest::new(1, 1).effective_page_size(), 1);
        assert_eq!(PaginatedRequest::new(1, 42).effective_page_size(), 42);
        assert_eq!(PaginatedRequest::new(1, 100).effective_page_size(), 100);
        assert_eq!(PaginatedRequest::new(1, 101).effective_page_size(), MAX_PAGE_SIZE);
        assert_eq!(PaginatedRequest::default().effective_page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn skip_uses_effective_values() {
        assert_eq!(PaginatedRequest::new(3, 10).skip(), 20);
        assert_eq!(PaginatedRequest::new(0, 0).skip(), 0);
        assert_eq!(PaginatedRequest::new(2, 500).skip(), 100);
        assert_eq!(PaginatedRequest::new(i64::MAX, 100).skip(), i64::MAX as u64);
    }

    #[test]
    fn query_string_binds_camel_case_fields() {
        let request = parse("pageNumber=2&pageSize=15&sortBy=createdAt&sortDescending=true");

        assert_eq!(request.page_number, Some(2));
        assert_eq!(request.page_size, Some(15));
        assert_eq!(request.sort_by.as_deref(), Some("createdAt"));
        assert!(request.sort_descending);
    }

    #[test]
    fn garbage_query_values_fall_back_to_defaults() {
        let request = parse("pageNumber=abc&pageSize=&sortDescending=maybe");

        assert_eq!(request.effective_page_number(), DEFAULT_PAGE_NUMBER);
        assert_eq!(request.effective_page_size(), DEFAULT_PAGE_SIZE);
        assert!(!request.sort_descending);
    }

    #[test]
    fn total_pages_rounds_up() {
        let response = PaginatedResponse::new(vec![1, 2, 3], 1, 3, 10);
        assert_eq!(response.total_pages, 4);

        let exact = PaginatedResponse::new(vec![1, 2], 1, 2, 10);
        assert_eq!(exact.total_pages, 5);
    }

    #[test]
    fn navigation_flags_follow_page_position() {
        let first = PaginatedResponse::new(vec![(); 20], 1, 20, 100);
        assert!(!first.has_previous_page);
        assert!(first.has_next_page);

        let middle = PaginatedResponse::new(vec![(); 20], 3, 20, 100);
        assert!(middle.has_previous_page);
        assert!(middle.has_next_page);

        let last = PaginatedResponse::new(vec![(); 20], 5, 20, 100);
        assert!(last.has_previous_page);
        assert!(!last.has_next_page);

        let beyond = PaginatedResponse::<()>::new(vec![], 9, 20, 100);
        assert!(beyond.has_previous_page);
        assert!(!beyond.has_next_page);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let response = PaginatedResponse::<()>::new(vec![], 1, 20, 0);

        assert_eq!(response.total_pages, 0);
        assert!(!response.has_previous_page);
        assert!(!response.has_next_page);
    }

    #[test]
    fn envelope_serializes_in_camel_case() {
        let response = PaginatedResponse::new(vec!["a"], 1, 20, 1);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "items": ["a"],
                "pageNumber": 1,
                "pageSize": 20,
                "totalCount": 1,
                "totalPages": 1,
                "hasPreviousPage": false,
                "hasNextPage": false,
            })
        );
    }

    #[test]
    fn metadata_keeps_header_field_order() {
        let response = PaginatedResponse::new(vec![0u8; 2], 2, 2, 9);
        let json = serde_json::to_string(&response.metadata()).unwrap();

        assert_eq!(
            json,
            r#"{"totalCount":9,"pageSize":2,"pageNumber":2,"totalPages":5,"hasNextPage":true,"hasPreviousPage":true}"#
        );
    }
}
