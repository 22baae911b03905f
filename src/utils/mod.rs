pub mod pagination_headers;
