use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;

use ops_portal::config::Config;
use ops_portal::entities::solution_stack;
use ops_portal::routes::create_routes;

async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

async fn insert(db: &DatabaseConnection, name: &str, description: &str, category: &str) -> solution_stack::Model {
    solution_stack::ActiveModel::new_stack(name, description, category, "platform-team")
        .insert(db)
        .await
        .unwrap()
}

async fn insert_many(db: &DatabaseConnection, count: usize) {
    for i in 1..=count {
        insert(db, &format!("Stack {i:02}"), "Generated stack", "Generated").await;
    }
}

fn app(db: DatabaseConnection) -> Router {
    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "SEED_DATA" => Some("false".to_string()),
        _ => None,
    })
    .unwrap();

    create_routes(db, &config)
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::HOST, "ops.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, headers, body)
}

fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

fn names(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn empty_catalogue_returns_metadata_without_links() {
    let (status, headers, body) = get(app(test_db().await), "/api/solution-stacks").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!headers.contains_key(header::LINK));

    let meta: Value = serde_json::from_str(headers["x-pagination"].to_str().unwrap()).unwrap();
    assert_eq!(meta["totalCount"], 0);
    assert_eq!(meta["pageNumber"], 1);
    assert_eq!(meta["pageSize"], 20);
    assert_eq!(meta["totalPages"], 0);

    let page = json(&body);
    assert_eq!(page["items"], Value::Array(vec![]));
    assert_eq!(page["hasNextPage"], false);
    assert_eq!(page["hasPreviousPage"], false);
}

#[tokio::test]
async fn first_page_links_forward() {
    let db = test_db().await;
    insert_many(&db, 25).await;

    let (status, headers, body) =
        get(app(db), "/api/solution-stacks?pageNumber=1&pageSize=10").await;

    assert_eq!(status, StatusCode::OK);
    let page = json(&body);
    assert_eq!(page["items"].as_array().unwrap().len(), 10);
    assert_eq!(page["totalCount"], 25);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["hasNextPage"], true);

    let link = headers[header::LINK].to_str().unwrap();
    assert!(link.contains(
        "<http://ops.example.com/api/solution-stacks?pageNumber=2&pageSize=10>; rel=\"next\""
    ));
    assert!(link.contains("pageNumber=3&pageSize=10>; rel=\"last\""));
    assert!(!link.contains("rel=\"prev\""));
}

#[tokio::test]
async fn last_page_is_partial_and_links_back() {
    let db = test_db().await;
    insert_many(&db, 25).await;

    let (_, headers, body) = get(app(db), "/api/solution-stacks?pageNumber=3&pageSize=10").await;

    let page = json(&body);
    assert_eq!(
        names(&page),
        vec!["Stack 21", "Stack 22", "Stack 23", "Stack 24", "Stack 25"]
    );
    assert_eq!(page["hasNextPage"], false);
    assert_eq!(page["hasPreviousPage"], true);

    let link = headers[header::LINK].to_str().unwrap();
    assert!(link.contains("pageNumber=2&pageSize=10>; rel=\"prev\""));
    assert!(!link.contains("rel=\"next\""));
}

#[tokio::test]
async fn page_size_is_capped() {
    let db = test_db().await;
    insert_many(&db, 3).await;

    let (_, _, body) = get(app(db), "/api/solution-stacks?pageSize=500").await;

    assert_eq!(json(&body)["pageSize"], 100);
}

#[tokio::test]
async fn unparseable_paging_values_fall_back_to_defaults() {
    let db = test_db().await;
    insert_many(&db, 3).await;

    let (status, _, body) =
        get(app(db), "/api/solution-stacks?pageNumber=abc&pageSize=-5").await;

    assert_eq!(status, StatusCode::OK);
    let page = json(&body);
    assert_eq!(page["pageNumber"], 1);
    assert_eq!(page["pageSize"], 20);
}

#[tokio::test]
async fn search_and_sort_combine() {
    let db = test_db().await;
    insert(&db, "Web Stack", "Frontend hosting", "Web").await;
    insert(&db, "Billing", "Legacy web app", "Finance").await;
    insert(&db, "Analytics", "Warehouse", "Data").await;

    let (_, _, body) = get(
        app(db),
        "/api/solution-stacks?searchTerm=WEB&sortBy=name&sortDescending=true",
    )
    .await;

    let page = json(&body);
    assert_eq!(names(&page), vec!["Web Stack", "Billing"]);
    assert_eq!(page["totalCount"], 2);
}

#[tokio::test]
async fn unknown_sort_field_orders_by_name() {
    let db = test_db().await;
    insert(&db, "Zeta", "z", "Z").await;
    insert(&db, "Alpha", "a", "A").await;
    insert(&db, "Mid", "m", "M").await;

    let (status, _, body) = get(app(db), "/api/solution-stacks?sortBy=bogus").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json(&body)), vec!["Alpha", "Mid", "Zeta"]);
}

#[tokio::test]
async fn links_keep_other_query_parameters() {
    let db = test_db().await;
    insert_many(&db, 5).await;

    let (_, headers, _) = get(
        app(db),
        "/api/solution-stacks?searchTerm=stack&pageSize=2&sortBy=name",
    )
    .await;

    let link = headers[header::LINK].to_str().unwrap();
    assert!(link.contains(
        "<http://ops.example.com/api/solution-stacks?searchTerm=stack&pageSize=2&sortBy=name&pageNumber=2>; rel=\"next\""
    ));
}

#[tokio::test]
async fn stack_is_returned_by_id_without_paging_headers() {
    let db = test_db().await;
    let stack = insert(&db, "Identity Service", "SSO", "Security").await;

    let (status, headers, body) =
        get(app(db), &format!("/api/solution-stacks/{}", stack.id)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!headers.contains_key("x-pagination"));
    assert!(!headers.contains_key(header::LINK));

    let found = json(&body);
    assert_eq!(found["id"], stack.id.to_string());
    assert_eq!(found["name"], "Identity Service");
    assert_eq!(found["slug"], "identity-service");
    assert_eq!(found["status"], "Active");
    assert!(found["createdAt"].is_string());
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let (status, headers, body) = get(
        app(test_db().await),
        "/api/solution-stacks/00000000-0000-0000-0000-000000000000",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
    assert!(!headers.contains_key("x-pagination"));
}

#[tokio::test]
async fn malformed_id_is_not_found() {
    let (status, _, _) = get(app(test_db().await), "/api/solution-stacks/not-a-uuid").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoints_report_status() {
    let db = test_db().await;

    let (status, _, body) = get(app(db.clone()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "healthy");

    let (status, _, body) = get(app(db), "/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["database"], "up");
}

#[tokio::test]
async fn landing_page_links_to_swagger() {
    let (status, headers, body) = get(app(test_db().await), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("/swagger-ui/"));
    assert!(html.contains("/api/solution-stacks"));
}

#[tokio::test]
async fn repeated_query_keys_use_the_first_value() {
    let db = test_db().await;
    insert(&db, "Alpha", "first", "A").await;
    insert(&db, "Beta", "second", "B").await;

    let (status, _, body) = get(
        app(db.clone()),
        "/api/solution-stacks?pageNumber=1&pageNumber=2&pageSize=1&pageSize=50",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let page = json(&body);
    assert_eq!(page["pageNumber"], 1);
    assert_eq!(page["pageSize"], 1);
    assert_eq!(names(&page), vec!["Alpha"]);

    let (status, _, body) = get(app(db), "/api/solution-stacks?searchTerm=a&searchTerm=b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json(&body)), vec!["Alpha", "Beta"]);
}
