//! OpenAPI contract: loading, operation lookup and JSON Schema validation.
//!
//! The document is parsed once at startup. Every `$ref` into the document is
//! inlined, every schema is compiled, and requests are then matched against
//! the operation table without touching the raw document again.

pub mod document;
pub mod error;
pub mod validator;

pub use document::{
    ContractDocument, Operation, Parameter, ParameterLocation, PathTemplate, RequestBody,
    RouteMatch,
};
pub use error::ContractError;
pub use validator::{ContractValidator, MatchedOperation, ValidationOptions};

/// The contract shipped with the binary.
pub const EMBEDDED_CONTRACT: &str = include_str!("../../openapi.yaml");
