use std::collections::BTreeMap;
use std::path::Path;

use axum::http::Method;
use oas3::spec::{Components, MediaType, ObjectOrReference, ObjectSchema, ParameterIn};
use oas3::OpenApiV3Spec;
use serde_json::{json, Map, Value};

use super::error::ContractError;
use super::EMBEDDED_CONTRACT;

/// Nesting limit for `$ref` chains; a cyclic reference runs into it.
const MAX_REF_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    /// Root segment used in validation issue paths.
    pub fn pointer_root(self) -> &'static str {
        match self {
            ParameterLocation::Path => "params",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "headers",
            ParameterLocation::Cookie => "cookies",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Value,
}

#[derive(Debug, Clone)]
pub struct RequestBody {
    pub required: bool,
    pub media_types: Vec<String>,
    /// Schema of the JSON media type, if one is declared
    pub schema: Option<Value>,
}

impl RequestBody {
    pub fn accepts(&self, media_type: &str) -> bool {
        self.media_types.iter().any(|declared| {
            declared == media_type
                || declared == "*/*"
                || declared
                    .strip_suffix('*')
                    .is_some_and(|prefix| prefix.ends_with('/') && media_type.starts_with(prefix))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// An OpenAPI path such as `/users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                _ => Segment::Literal(s.to_string()),
            })
            .collect();

        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the captured parameters when `path` fits this template.
    ///
    /// Empty segments never match, so `/hello/` and `//hello` are not `/hello`.
    pub fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };
        if parts.len() != self.segments.len() || parts.iter().any(|p| p.is_empty()) {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => params.push((name.clone(), part.to_string())),
            }
        }
        Some(params)
    }

    fn specificity(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }
}

#[derive(Debug, Clone)]
pub struct Operation {
    pub method: Method,
    pub template: PathTemplate,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    /// Status key (`200`, `4XX`, `default`) to the JSON schema of that response, if any
    pub responses: BTreeMap<String, Option<Value>>,
}

impl Operation {
    /// The response key covering `status`: exact code, then `NXX` range, then `default`.
    pub fn response_key(&self, status: u16) -> Option<&str> {
        let exact = status.to_string();
        let range = format!("{}XX", status / 100);
        let candidates = [exact, range, "default".to_string()];

        let found = candidates.iter().find_map(|key| {
            self.responses
                .get_key_value(key.as_str())
                .or_else(|| self.responses.get_key_value(key.to_lowercase().as_str()))
                .map(|(k, _)| k.as_str())
        });
        found
    }
}

/// Result of looking a request up in the operation table.
#[derive(Debug)]
pub enum RouteMatch<'a> {
    Found {
        index: usize,
        operation: &'a Operation,
        params: Vec<(String, String)>,
    },
    MethodNotAllowed {
        allowed: Vec<Method>,
    },
    NotFound,
}

/// A parsed OpenAPI document with all references inlined.
#[derive(Debug, Clone)]
pub struct ContractDocument {
    raw: Value,
    title: String,
    version: String,
    operations: Vec<Operation>,
}

impl ContractDocument {
    pub fn embedded() -> Result<Self, ContractError> {
        Self::from_yaml(EMBEDDED_CONTRACT)
    }

    /// Loads from `path`, or the embedded contract when none is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ContractError> {
        match path {
            Some(path) => {
                let source = std::fs::read_to_string(path).map_err(|source| ContractError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                tracing::info!("Loading contract from {}", path.display());
                Self::from_yaml(&source)
            }
            None => Self::embedded(),
        }
    }

    /// YAML is a superset of JSON, so this also accepts JSON documents.
    pub fn from_yaml(source: &str) -> Result<Self, ContractError> {
        let raw: Value = serde_yaml::from_str(source)?;
        Self::from_value(raw)
    }

    pub fn from_value(raw: Value) -> Result<Self, ContractError> {
        let spec: OpenApiV3Spec = serde_json::from_value(raw.clone())?;
        let paths = spec
            .paths
            .as_ref()
            .filter(|paths| !paths.is_empty())
            .ok_or(ContractError::MissingPaths)?;

        let mut operations = Vec::new();
        for (template, item) in paths {
            let shared = build_parameters(&spec, &raw, &item.parameters)?;
            for (method, definition) in item.methods() {
                operations.push(build_operation(
                    &spec,
                    &raw,
                    method.as_str(),
                    template,
                    definition,
                    &shared,
                )?);
            }
        }

        // literal segments win over parameters: `/users/me` before `/users/{id}`
        operations.sort_by(|a, b| b.template.specificity().cmp(&a.template.specificity()));

        tracing::debug!("Contract loaded with {} operations", operations.len());
        Ok(Self {
            title: spec.info.title.clone(),
            version: spec.info.version.clone(),
            raw,
            operations,
        })
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Finds the operation for an unversioned path. `HEAD` falls back to `GET`.
    pub fn lookup(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        let mut candidates = Vec::new();
        for (index, operation) in self.operations.iter().enumerate() {
            if let Some(params) = operation.template.matches(path) {
                if operation.method == *method {
                    return RouteMatch::Found {
                        index,
                        operation,
                        params,
                    };
                }
                candidates.push((index, operation, params));
            }
        }

        if *method == Method::HEAD {
            if let Some((index, operation, params)) = candidates
                .iter()
                .find(|(_, op, _)| op.method == Method::GET)
                .cloned()
            {
                return RouteMatch::Found {
                    index,
                    operation,
                    params,
                };
            }
        }

        if candidates.is_empty() {
            RouteMatch::NotFound
        } else {
            RouteMatch::MethodNotAllowed {
                allowed: candidates.into_iter().map(|(_, op, _)| op.method.clone()).collect(),
            }
        }
    }
}

fn build_operation(
    spec: &OpenApiV3Spec,
    raw: &Value,
    method: &str,
    template: &str,
    definition: &oas3::spec::Operation,
    shared: &[Parameter],
) -> Result<Operation, ContractError> {
    let location = format!("{} {}", method.to_uppercase(), template);
    let method = Method::from_bytes(method.to_uppercase().as_bytes()).map_err(|e| {
        ContractError::InvalidSchema {
            location: location.clone(),
            message: e.to_string(),
        }
    })?;

    // operation parameters override path-level ones with the same name and location
    let own = build_parameters(spec, raw, &definition.parameters)?;
    let mut parameters: Vec<Parameter> = shared
        .iter()
        .filter(|p| {
            !own.iter()
                .any(|o| o.name == p.name && o.location == p.location)
        })
        .cloned()
        .collect();
    parameters.extend(own);

    let request_body = match &definition.request_body {
        Some(body) => {
            let body = resolve(spec, body, "#/components/requestBodies/", request_bodies)?;
            Some(RequestBody {
                required: body.required.unwrap_or(false),
                media_types: body.content.keys().map(|k| k.to_lowercase()).collect(),
                schema: json_schema_of(raw, &body.content)?,
            })
        }
        None => None,
    };

    let mut responses = BTreeMap::new();
    for (status, response) in definition.responses.iter().flatten() {
        let response = resolve(spec, response, "#/components/responses/", responses_table)?;
        responses.insert(status.clone(), json_schema_of(raw, &response.content)?);
    }

    Ok(Operation {
        method,
        template: PathTemplate::parse(template),
        operation_id: definition.operation_id.clone(),
        summary: definition.summary.clone(),
        parameters,
        request_body,
        responses,
    })
}

fn build_parameters(
    spec: &OpenApiV3Spec,
    raw: &Value,
    declared: &[ObjectOrReference<oas3::spec::Parameter>],
) -> Result<Vec<Parameter>, ContractError> {
    let mut out = Vec::with_capacity(declared.len());
    for param in declared {
        let param = resolve(spec, param, "#/components/parameters/", parameters_table)?;
        let param_location = match param.location {
            ParameterIn::Path => ParameterLocation::Path,
            ParameterIn::Query => ParameterLocation::Query,
            ParameterIn::Header => ParameterLocation::Header,
            ParameterIn::Cookie => ParameterLocation::Cookie,
        };
        let schema = match &param.schema {
            Some(schema) => schema_value(raw, schema)?,
            None => Value::Object(Map::new()),
        };

        out.push(Parameter {
            name: param.name.clone(),
            location: param_location,
            required: param.required.unwrap_or(param_location == ParameterLocation::Path),
            schema,
        });
    }
    Ok(out)
}

fn parameters_table(c: &Components) -> &BTreeMap<String, ObjectOrReference<oas3::spec::Parameter>> {
    &c.parameters
}

fn request_bodies(c: &Components) -> &BTreeMap<String, ObjectOrReference<oas3::spec::RequestBody>> {
    &c.request_bodies
}

fn responses_table(c: &Components) -> &BTreeMap<String, ObjectOrReference<oas3::spec::Response>> {
    &c.responses
}

/// Follows a component reference (`#/components/<kind>/<name>`) to its object.
fn resolve<'a, T>(
    spec: &'a OpenApiV3Spec,
    item: &'a ObjectOrReference<T>,
    prefix: &str,
    table: fn(&Components) -> &BTreeMap<String, ObjectOrReference<T>>,
) -> Result<&'a T, ContractError> {
    let mut item = item;
    for _ in 0..MAX_REF_DEPTH {
        match item {
            ObjectOrReference::Object(object) => return Ok(object),
            ObjectOrReference::Ref { ref_path, .. } => {
                item = ref_path
                    .strip_prefix(prefix)
                    .and_then(|name| spec.components.as_ref().and_then(|c| table(c).get(name)))
                    .ok_or_else(|| ContractError::UnresolvedRef(ref_path.clone()))?;
            }
        }
    }
    Err(ContractError::RefDepth(MAX_REF_DEPTH))
}

/// Schema of `application/json` (or any `+json` type) in a content map.
fn json_schema_of(
    raw: &Value,
    content: &BTreeMap<String, MediaType>,
) -> Result<Option<Value>, ContractError> {
    let media = content.get("application/json").or_else(|| {
        content
            .iter()
            .find(|(media, _)| media.ends_with("+json"))
            .map(|(_, v)| v)
    });

    match media {
        None => Ok(None),
        Some(media) => match &media.schema {
            Some(schema) => schema_value(raw, schema).map(Some),
            None => Ok(Some(Value::Object(Map::new()))),
        },
    }
}

/// A typed schema as plain JSON Schema, with references into `raw` inlined.
fn schema_value(
    raw: &Value,
    schema: &ObjectOrReference<ObjectSchema>,
) -> Result<Value, ContractError> {
    let value = match schema {
        ObjectOrReference::Ref { ref_path, .. } => json!({ "$ref": ref_path }),
        ObjectOrReference::Object(object) => serde_json::to_value(object)?,
    };
    Ok(to_json_schema(&resolve_refs(&value, raw, 0)?))
}

/// Inlines every `$ref` pointing into the document.
fn resolve_refs(node: &Value, root: &Value, depth: usize) -> Result<Value, ContractError> {
    if depth > MAX_REF_DEPTH {
        return Err(ContractError::RefDepth(MAX_REF_DEPTH));
    }

    match node {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                let target = reference
                    .strip_prefix('#')
                    .and_then(|pointer| root.pointer(pointer))
                    .ok_or_else(|| ContractError::UnresolvedRef(reference.clone()))?;
                return resolve_refs(target, root, depth + 1);
            }

            let mut resolved = Map::with_capacity(map.len());
            for (key, value) in map {
                resolved.insert(key.clone(), resolve_refs(value, root, depth)?);
            }
            Ok(Value::Object(resolved))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| resolve_refs(item, root, depth))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}

/// Rewrites OpenAPI 3.0 `nullable: true` into a JSON Schema type union.
fn to_json_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let nullable = map.get("nullable") == Some(&Value::Bool(true));
            let mut out = Map::with_capacity(map.len());
            for (key, value) in map {
                if key == "nullable" && value.is_boolean() {
                    continue;
                }
                out.insert(key.clone(), to_json_schema(value));
            }
            if nullable {
                if let Some(Value::String(ty)) = out.get("type").cloned() {
                    out.insert(
                        "type".to_string(),
                        Value::Array(vec![Value::String(ty), Value::String("null".into())]),
                    );
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(to_json_schema).collect()),
        other => other.clone(),
    }
}
