// handlers/mod.rs - request handlers shared by every API version
//
// Handlers never see the version prefix: the router mounts the same set under
// /v1 and /v2, and the contract middleware has already validated the request
// by the time a handler runs.

pub mod docs;
pub mod hello;
pub mod products;
pub mod users;
