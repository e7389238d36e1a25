use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, DocsConfig};
use crate::contract::ContractValidator;
use crate::error::ApiError;
use crate::handlers::{docs, hello, products, users};
use crate::middleware::{contract_validation, panic_response};
use crate::store::{ProductStore, UserStore};
use crate::version::ApiVersion;

/// Names the version that served a response.
pub const API_VERSION_HEADER: HeaderName = HeaderName::from_static("x-api-version");

/// Everything handlers and middleware share. Stores are handles, so every
/// clone of the state sees the same records.
#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub products: ProductStore,
    pub contract: Arc<ContractValidator>,
    pub docs_spec_path: Arc<str>,
}

impl AppState {
    pub fn new(contract: ContractValidator, docs: &DocsConfig) -> Self {
        Self {
            users: UserStore::new(),
            products: ProductStore::new(),
            contract: Arc::new(contract),
            docs_spec_path: Arc::from(format!("{}/openapi.json", docs.path.trim_end_matches('/'))),
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new();
    for version in ApiVersion::ALL {
        router = router.nest(version.prefix(), versioned_routes(version));
    }
    if config.docs.enabled {
        router = router.merge(docs_routes(&config.docs.path));
    }

    let mut app = router
        .fallback(not_found)
        // extractors share the limit the contract middleware enforces
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(from_fn_with_state(state.clone(), contract_validation))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state);

    // Global middleware
    if config.api.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

/// The operation set every version mounts.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/hello", get(hello::get))
        .route("/users", post(users::create))
        .route(
            "/users/:id",
            get(users::get).post(users::update).delete(users::delete),
        )
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            get(products::get)
                .put(products::replace)
                .delete(products::delete),
        )
}

fn versioned_routes(version: ApiVersion) -> Router<AppState> {
    api_routes().layer(SetResponseHeaderLayer::overriding(
        API_VERSION_HEADER,
        HeaderValue::from_static(version.as_str()),
    ))
}

fn docs_routes(path: &str) -> Router<AppState> {
    let path = path.trim_end_matches('/');
    Router::new()
        .route(path, get(docs::ui))
        .route(&format!("{}/openapi.json", path), get(docs::openapi))
}

async fn not_found() -> ApiError {
    ApiError::not_found("not found")
}
