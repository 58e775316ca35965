//! Documentation endpoints
//!
//! Serves Swagger UI and the raw OpenAPI spec. Only mounted when docs are
//! enabled in configuration.

use axum::{response::Html, routing::get, Json, Router};
use utoipa::OpenApi;

use crate::docs::RelayApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(RelayApiDoc::openapi())
}

async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

/// Create the docs router
///
/// Routes:
/// - GET /api/docs - Swagger UI
/// - GET /api/docs/openapi.json - Raw OpenAPI spec
///
/// Generic over state so it can be merged into the stateful app router.
pub fn create_docs_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/api/docs", get(swagger_ui))
        .route("/api/docs/", get(swagger_ui))
        .route("/api/docs/openapi.json", get(openapi_json))
}

/// Swagger UI page; assets come from the unpkg CDN
const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Studio Relay API - Documentation</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api/docs/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [SwaggerUIBundle.presets.apis]
            });
        };
    </script>
</body>
</html>"#;
