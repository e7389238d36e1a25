use axum::{
    body::{Body, Bytes},
    extract::{Query, Request, State},
    http::{header, HeaderMap, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::contract::ContractValidator;
use crate::error::ApiError;
use crate::version::ApiVersion;

/// Middleware that enforces the OpenAPI contract around every handler.
///
/// Stages run in order: parse (version prefix + operation lookup), validate the
/// request, dispatch to the handler, validate the response. A failure at any
/// stage short-circuits into the `{message, errors?}` envelope.
pub async fn contract_validation(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    match validate_exchange(&state.contract, request, next).await {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!("Contract check failed ({}): {}", err.status_code(), err);
            err.into_response()
        }
    }
}

async fn validate_exchange(
    contract: &ContractValidator,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let options = contract.options();
    let path = request.uri().path().to_string();

    if contract.is_exempt(&path) || !(options.validate_requests || options.validate_responses) {
        return Ok(next.run(request).await);
    }

    let method = request.method().clone();
    let matched = match ApiVersion::split_path(&path) {
        Some((_, unversioned)) => contract.match_operation(&method, unversioned),
        None => Err(ApiError::not_found("not found")),
    };
    let matched = match matched {
        Ok(matched) => matched,
        Err(err) if options.validate_requests => return Err(err),
        // no operation means no response schema either
        Err(_) => return Ok(next.run(request).await),
    };

    let (parts, body) = request.into_parts();
    let bytes = read_request_body(&parts.headers, body, options.max_body_bytes).await?;

    if options.validate_requests {
        let query = query_pairs(&parts.uri)?;
        contract.validate_parameters(&matched, &query)?;
        contract.validate_request_body(&matched, content_type(&parts.headers), &bytes)?;
    }

    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;
    if !options.validate_responses {
        return Ok(response);
    }

    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.map_err(|e| {
        tracing::error!("Failed to buffer response body: {}", e);
        ApiError::internal_server_error("Failed to read response body")
    })?;

    if let Err(err) = contract.validate_response(&matched, parts.status.as_u16(), &bytes) {
        tracing::error!("{} {} violated its response contract: {}", method, path, err);
        return Err(err);
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}

async fn read_request_body(headers: &HeaderMap, body: Body, limit: usize) -> Result<Bytes, ApiError> {
    let too_large = || ApiError::payload_too_large(format!("request body exceeds {} bytes", limit));

    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > limit) {
        return Err(too_large());
    }

    axum::body::to_bytes(body, limit).await.map_err(|_| too_large())
}

fn query_pairs(uri: &Uri) -> Result<Vec<(String, String)>, ApiError> {
    Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map(|Query(pairs)| pairs)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}
