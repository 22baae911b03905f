mod health;
mod home;
mod solution_stacks;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::utils::pagination_headers::X_PAGINATION;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

// Define the OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // General endpoints
        home::root,
        health::health,
        health::ready,
        // Solution stack endpoints
        solution_stacks::list_solution_stacks,
        solution_stacks::get_solution_stack,
    ),
    components(
        schemas(
            health::HealthResponse,
            crate::models::solution_stack::SolutionStackResponse,
        )
    ),
    tags(
        (name = "General", description = "General API information and health checks"),
        (name = "Solution Stacks", description = "Read access to the solution stack catalogue")
    ),
    info(
        title = "OpsPortal API",
        version = "0.1.0",
        description = "Paginated, searchable catalogue of operational solution stacks",
    )
)]
struct ApiDoc;

pub fn create_routes(db: DatabaseConnection, config: &Config) -> Router {
    // Swagger UI (stateless)
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    let app_routes = Router::new()
        .route("/", get(home::root))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        .route("/api/solution-stacks", get(solution_stacks::list_solution_stacks))
        .route("/api/solution-stacks/{id}", get(solution_stacks::get_solution_stack))
        .with_state(db);

    Router::new()
        .merge(swagger_router)
        .merge(app_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
}

/// Development accepts any origin. Production only accepts the configured
/// origins, with credentials.
fn cors_layer(config: &Config) -> CorsLayer {
    let exposed = [X_PAGINATION, header::LINK];

    if config.is_development() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(exposed);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("No CORS origins configured, cross-origin requests will be refused");
    }

    // Credentials rule out wildcards, so methods and headers echo the preflight.
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers(exposed)
}
