use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Renders a handler panic as a 500 envelope instead of dropping the connection.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!("Handler panicked: {}", detail);

    ApiError::internal_server_error("An error occurred while processing your request").into_response()
}
