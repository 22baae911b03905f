//! `X-Pagination` and RFC 5988 `Link` headers for paginated list responses.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue};
use url::{form_urlencoded, Url};

use crate::pagination::{PaginatedResponse, PaginationMetadata};

pub const X_PAGINATION: HeaderName = HeaderName::from_static("x-pagination");

const PAGE_NUMBER_PARAM: &str = "pageNumber";
const PAGE_SIZE_PARAM: &str = "pageSize";

/// Where the inbound request was addressed, as needed to point links back at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    pub scheme: String,
    pub host: String,
    pub path: String,
    pub query: Option<String>,
}

impl RequestUrl {
    pub fn new(scheme: &str, host: &str, path: &str, query: Option<&str>) -> Self {
        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            path: path.to_string(),
            query: query.map(str::to_string),
        }
    }

    /// This URL with `pageNumber`/`pageSize` set and every other query
    /// parameter left as it was sent.
    pub fn with_page(&self, page_number: u64, page_size: u64) -> String {
        let mut params: Vec<String> = Vec::new();
        let mut has_number = false;
        let mut has_size = false;

        let segments = self
            .query
            .as_deref()
            .unwrap_or_default()
            .split('&')
            .filter(|s| !s.is_empty());

        for segment in segments {
            let raw_key = segment.split('=').next().unwrap_or(segment);
            let key = form_urlencoded::parse(raw_key.as_bytes())
                .next()
                .map(|(k, _)| k.into_owned())
                .unwrap_or_default();

            if key.eq_ignore_ascii_case(PAGE_NUMBER_PARAM) {
                if !has_number {
                    params.push(format!("{PAGE_NUMBER_PARAM}={page_number}"));
                    has_number = true;
                }
            } else if key.eq_ignore_ascii_case(PAGE_SIZE_PARAM) {
                if !has_size {
                    params.push(format!("{PAGE_SIZE_PARAM}={page_size}"));
                    has_size = true;
                }
            } else {
                params.push(segment.to_string());
            }
        }

        if !has_number {
            params.push(format!("{PAGE_NUMBER_PARAM}={page_number}"));
        }
        if !has_size {
            params.push(format!("{PAGE_SIZE_PARAM}={page_size}"));
        }

        // The base is normalized; the query is appended as sent.
        let base = format!("{}://{}{}", self.scheme, self.host, self.path);
        let base = Url::parse(&base).map(String::from).unwrap_or(base);
        format!("{base}?{}", params.join("&"))
    }
}

impl<S> FromRequestParts<S> for RequestUrl
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers strip their prefix from `parts.uri`.
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());

        let scheme = uri
            .scheme_str()
            .or_else(|| header_str(&parts.headers, "x-forwarded-proto"))
            .unwrap_or("http");

        let host = header_str(&parts.headers, header::HOST.as_str())
            .or_else(|| uri.authority().map(|a| a.as_str()))
            .unwrap_or("localhost");

        Ok(RequestUrl::new(scheme, host, uri.path(), uri.query()))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim())
        .filter(|v| !v.is_empty())
}

/// A relation to another page of the same result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationLink {
    pub rel: &'static str,
    pub url: String,
}

impl NavigationLink {
    fn render(&self) -> String {
        format!("<{}>; rel=\"{}\"", self.url, self.rel)
    }
}

pub fn navigation_links(meta: &PaginationMetadata, request: &RequestUrl) -> Vec<NavigationLink> {
    let mut links = Vec::new();
    let size = meta.page_size;

    if meta.page_number > 1 {
        links.push(NavigationLink {
            rel: "first",
            url: request.with_page(1, size),
        });
    }
    if meta.has_previous_page {
        links.push(NavigationLink {
            rel: "prev",
            url: request.with_page(meta.page_number - 1, size),
        });
    }
    if meta.has_next_page {
        links.push(NavigationLink {
            rel: "next",
            url: request.with_page(meta.page_number + 1, size),
        });
    }
    if meta.page_number < meta.total_pages {
        links.push(NavigationLink {
            rel: "last",
            url: request.with_page(meta.total_pages, size),
        });
    }

    links
}

/// `None` when the result set has no other page to point at.
pub fn link_header(meta: &PaginationMetadata, request: &RequestUrl) -> Option<String> {
    let links = navigation_links(meta, request);
    if links.is_empty() {
        return None;
    }

    Some(
        links
            .iter()
            .map(NavigationLink::render)
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Always carries `X-Pagination`; carries `Link` only when a relation applies.
pub fn pagination_headers<T>(page: &PaginatedResponse<T>, request: &RequestUrl) -> HeaderMap {
    let meta = page.metadata();
    let mut headers = HeaderMap::new();

    match serde_json::to_string(&meta)
        .map_err(|e| e.to_string())
        .and_then(|json| HeaderValue::from_str(&json).map_err(|e| e.to_string()))
    {
        Ok(value) => {
            headers.insert(X_PAGINATION, value);
        }
        Err(e) => tracing::warn!(error = %e, "Could not encode X-Pagination header"),
    }

    if let Some(links) = link_header(&meta, request) {
        match HeaderValue::from_str(&links) {
            Ok(value) => {
                headers.insert(header::LINK, value);
            }
            Err(e) => tracing::warn!(error = %e, "Could not encode Link header"),
        }
    }

    headers
}
