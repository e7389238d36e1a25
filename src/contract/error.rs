use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading or compiling the contract. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("failed to read contract {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid contract document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("contract is not a valid OpenAPI document: {0}")]
    Spec(#[from] serde_json::Error),

    #[error("contract has no paths object")]
    MissingPaths,

    #[error("unresolved reference: {0}")]
    UnresolvedRef(String),

    #[error("reference nesting exceeds {0} levels (cyclic $ref?)")]
    RefDepth(usize),

    #[error("invalid schema for {location}: {message}")]
    InvalidSchema { location: String, message: String },
}
