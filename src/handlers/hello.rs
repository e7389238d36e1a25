use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// GET /hello
pub async fn get() -> ApiResult<Message> {
    Ok(ApiResponse::success(Message {
        message: "Hello world",
    }))
}
