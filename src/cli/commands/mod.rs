pub mod contract;
pub mod routes;
pub mod serve;
