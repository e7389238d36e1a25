pub mod app;
pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod store;
pub mod version;
