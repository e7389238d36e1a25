use axum::{
    extract::State,
    response::{Html, IntoResponse, Json},
};

use crate::app::AppState;

/// GET /docs - Swagger UI over the served contract
pub async fn ui(State(state): State<AppState>) -> impl IntoResponse {
    let title = state.contract.document().title();
    Html(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>{title}</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {{
      window.ui = SwaggerUIBundle({{ url: "{spec}", dom_id: "#swagger-ui" }});
    }};
  </script>
</body>
</html>
"##,
        title = title,
        spec = state.docs_spec_path,
    ))
}

/// GET /docs/openapi.json - The contract as JSON
pub async fn openapi(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.contract.document().raw().clone())
}
