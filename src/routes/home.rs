use axum::response::Html;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Landing page HTML", content_type = "text/html")
    ),
    tag = "General"
)]
pub async fn root() -> Html<&'static str> {
    Html(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>OpsPortal API</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 40rem; margin: 3rem auto; color: #222; }
        code { background: #eef; padding: 0 0.25rem; }
        li { margin: 0.4rem 0; }
    </style>
</head>
<body>
    <h1>OpsPortal API</h1>
    <p>Read-only catalogue of the solution stacks run by operations teams.</p>
    <ul>
        <li><code>GET /api/solution-stacks</code> paged list, see <code>X-Pagination</code> and <code>Link</code></li>
        <li><code>GET /api/solution-stacks/{id}</code> a single stack</li>
        <li><code>GET /health/ready</code> database readiness</li>
    </ul>
    <p><a href="/swagger-ui/">Interactive API docs</a></p>
</body>
</html>
"#)
}
