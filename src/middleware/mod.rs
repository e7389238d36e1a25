pub mod contract;
pub mod json;
pub mod recover;
pub mod response;

pub use contract::contract_validation;
pub use json::ApiJson;
pub use recover::panic_response;
pub use response::{ApiResponse, ApiResult};
