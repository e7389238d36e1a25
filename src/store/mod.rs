//! In-memory resource stores.
//!
//! Each store is a cheap-to-clone handle over shared state; the server builds
//! one of each at startup and hands them to the router through `AppState`.

pub mod ids;
pub mod products;
pub mod users;

use thiserror::Error;

pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use products::{Product, ProductStore};
pub use users::{User, UserInput, UserStore, UserSummary};

/// Store failures. Lookups that miss are not errors; they return `None`/`false`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} store lock poisoned")]
    Poisoned(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;
