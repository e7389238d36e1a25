use std::collections::HashMap;

use axum::http::Method;
use jsonschema::Validator;
use serde_json::Value;

use super::document::{ContractDocument, Operation, ParameterLocation, RouteMatch};
use super::error::ContractError;
use crate::config::AppConfig;
use crate::error::{ApiError, ValidationIssue};

/// Which checks run, and how strictly.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    pub validate_requests: bool,
    pub validate_responses: bool,
    pub allow_unknown_query_parameters: bool,
    pub max_body_bytes: usize,
    /// Any path containing this segment bypasses validation
    pub ignore_segment: String,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            validate_requests: true,
            validate_responses: true,
            allow_unknown_query_parameters: false,
            max_body_bytes: 1024 * 1024,
            ignore_segment: "docs".to_string(),
        }
    }
}

impl ValidationOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            validate_requests: config.validation.validate_requests,
            validate_responses: config.validation.validate_responses,
            allow_unknown_query_parameters: config.validation.allow_unknown_query_parameters,
            max_body_bytes: config.api.max_request_size_bytes,
            ignore_segment: config.docs.path.trim_matches('/').to_string(),
        }
    }
}

/// Validators compiled for one operation, parallel to its declaration.
struct CompiledOperation {
    parameters: Vec<Validator>,
    body: Option<Validator>,
    responses: HashMap<String, Validator>,
}

/// An operation matched for a request, with its captured path parameters.
pub struct MatchedOperation<'a> {
    pub operation: &'a Operation,
    pub params: Vec<(String, String)>,
    compiled: &'a CompiledOperation,
}

/// Request and response validation against a compiled contract.
///
/// All schemas are compiled up front so a bad contract fails at startup,
/// not on the first request that touches it.
pub struct ContractValidator {
    document: ContractDocument,
    compiled: Vec<CompiledOperation>,
    options: ValidationOptions,
}

impl ContractValidator {
    pub fn new(document: ContractDocument, options: ValidationOptions) -> Result<Self, ContractError> {
        let compiled = document
            .operations()
            .iter()
            .map(compile_operation)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            "Compiled contract '{}' v{} ({} operations)",
            document.title(),
            document.version(),
            compiled.len()
        );

        Ok(Self {
            document,
            compiled,
            options,
        })
    }

    pub fn document(&self) -> &ContractDocument {
        &self.document
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        !self.options.ignore_segment.is_empty()
            && path.split('/').any(|segment| segment == self.options.ignore_segment)
    }

    /// Looks up the operation for an unversioned path.
    pub fn match_operation(&self, method: &Method, path: &str) -> Result<MatchedOperation<'_>, ApiError> {
        match self.document.lookup(method, path) {
            RouteMatch::Found {
                index,
                operation,
                params,
            } => {
                let compiled = self.compiled.get(index).ok_or_else(|| {
                    ApiError::internal_server_error("contract operation table is inconsistent")
                })?;
                Ok(MatchedOperation {
                    operation,
                    params,
                    compiled,
                })
            }
            RouteMatch::MethodNotAllowed { .. } => {
                Err(ApiError::method_not_allowed(format!("{} method not allowed", method)))
            }
            RouteMatch::NotFound => Err(ApiError::not_found("not found")),
        }
    }

    /// Checks path and query parameters. Query values arrive already decoded.
    pub fn validate_parameters(
        &self,
        matched: &MatchedOperation<'_>,
        query: &[(String, String)],
    ) -> Result<(), ApiError> {
        let operation = matched.operation;

        if !self.options.allow_unknown_query_parameters {
            for (name, _) in query {
                let declared = operation
                    .parameters
                    .iter()
                    .any(|p| p.location == ParameterLocation::Query && &p.name == name);
                if !declared {
                    return Err(ApiError::bad_request(format!("Unknown query parameter '{}'", name)));
                }
            }
        }

        let mut issues = Vec::new();
        for (param, validator) in operation.parameters.iter().zip(&matched.compiled.parameters) {
            let raw: Vec<&str> = match param.location {
                ParameterLocation::Path => matched
                    .params
                    .iter()
                    .filter(|(name, _)| name == &param.name)
                    .map(|(_, value)| value.as_str())
                    .collect(),
                ParameterLocation::Query => query
                    .iter()
                    .filter(|(name, _)| name == &param.name)
                    .map(|(_, value)| value.as_str())
                    .collect(),
                // headers and cookies are not part of this API
                ParameterLocation::Header | ParameterLocation::Cookie => continue,
            };

            let pointer = format!("/{}/{}", param.location.pointer_root(), param.name);
            let Some(value) = coerce_parameter(&raw, &param.schema) else {
                if param.required {
                    issues.push(ValidationIssue::new(
                        pointer,
                        format!("required parameter '{}' is missing", param.name),
                    ));
                }
                continue;
            };
            collect_issues(validator, &value, &pointer, &mut issues);
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ApiError::from_issues("request", issues))
        }
    }

    /// Checks content type, presence and shape of the request body.
    pub fn validate_request_body(
        &self,
        matched: &MatchedOperation<'_>,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<(), ApiError> {
        let Some(declared) = &matched.operation.request_body else {
            return Ok(());
        };

        if body.is_empty() {
            return if declared.required {
                Err(ApiError::from_issues(
                    "request",
                    vec![ValidationIssue::new("/body", "is required")],
                ))
            } else {
                Ok(())
            };
        }

        match content_type.map(media_type) {
            Some(media) if declared.accepts(&media) => {}
            Some(media) => {
                return Err(ApiError::unsupported_media_type(format!(
                    "unsupported media type {}",
                    media
                )))
            }
            None => {
                return Err(ApiError::unsupported_media_type(
                    "unsupported media type (none)",
                ))
            }
        }

        let Some(validator) = &matched.compiled.body else {
            return Ok(());
        };

        let instance: Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::invalid_json(format!("request/body is not valid JSON: {}", e)))?;

        let mut issues = Vec::new();
        collect_issues(validator, &instance, "/body", &mut issues);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ApiError::from_issues("request", issues))
        }
    }

    /// Checks an outbound body against the schema declared for its status.
    ///
    /// 5xx responses are passed through: they already report a failure.
    pub fn validate_response(
        &self,
        matched: &MatchedOperation<'_>,
        status: u16,
        body: &[u8],
    ) -> Result<(), ApiError> {
        if status >= 500 {
            return Ok(());
        }

        let Some(key) = matched.operation.response_key(status) else {
            return Err(ApiError::internal_server_error(format!(
                "no schema defined for status code '{}' in the openapi spec",
                status
            )));
        };
        let Some(validator) = matched.compiled.responses.get(key) else {
            return Ok(());
        };

        let instance: Value = serde_json::from_slice(body).map_err(|e| {
            ApiError::response_validation(vec![ValidationIssue::new(
                "/response",
                format!("is not valid JSON: {}", e),
            )])
        })?;

        let mut issues = Vec::new();
        collect_issues(validator, &instance, "/response", &mut issues);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ApiError::response_validation(issues))
        }
    }
}

fn compile_operation(operation: &Operation) -> Result<CompiledOperation, ContractError> {
    let location = format!("{} {}", operation.method, operation.template.as_str());

    let parameters = operation
        .parameters
        .iter()
        .map(|p| compile(&p.schema, format!("{} parameter '{}'", location, p.name)))
        .collect::<Result<Vec<_>, _>>()?;

    let body = operation
        .request_body
        .as_ref()
        .and_then(|b| b.schema.as_ref())
        .map(|schema| compile(schema, format!("{} request body", location)))
        .transpose()?;

    let mut responses = HashMap::new();
    for (status, schema) in &operation.responses {
        if let Some(schema) = schema {
            let validator = compile(schema, format!("{} response {}", location, status))?;
            responses.insert(status.clone(), validator);
        }
    }

    Ok(CompiledOperation {
        parameters,
        body,
        responses,
    })
}

fn compile(schema: &Value, location: String) -> Result<Validator, ContractError> {
    jsonschema::validator_for(schema).map_err(|e| ContractError::InvalidSchema {
        location,
        message: e.to_string(),
    })
}

fn collect_issues(validator: &Validator, instance: &Value, root: &str, issues: &mut Vec<ValidationIssue>) {
    for error in validator.iter_errors(instance) {
        issues.push(ValidationIssue::new(
            format!("{}{}", root, error.instance_path),
            error.to_string(),
        ));
    }
}

/// `application/json; charset=utf-8` -> `application/json`
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Turns raw parameter strings into the JSON type the schema expects.
/// Values that do not parse stay strings so the schema reports them.
fn coerce_parameter(raw: &[&str], schema: &Value) -> Option<Value> {
    if schema.get("type").and_then(Value::as_str) == Some("array") {
        if raw.is_empty() {
            return None;
        }
        let items = schema.get("items").unwrap_or(&Value::Null);
        return Some(Value::Array(
            raw.iter()
                .flat_map(|value| value.split(','))
                .map(|value| coerce_scalar(value, items))
                .collect(),
        ));
    }

    raw.last().map(|value| coerce_scalar(value, schema))
}

fn coerce_scalar(raw: &str, schema: &Value) -> Value {
    let fallback = || Value::String(raw.to_string());
    match schema.get("type").and_then(Value::as_str) {
        Some("integer") => raw.parse::<i64>().map(Value::from).unwrap_or_else(|_| fallback()),
        Some("number") => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(fallback),
        Some("boolean") => match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => fallback(),
        },
        _ => fallback(),
    }
}
