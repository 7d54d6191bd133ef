//! Sheetbridge API server module
//!
//! HTTP surface for the two conversion endpoints plus health/info
//! endpoints. Run with `sheetbridge`.

pub mod handlers;
pub mod server;

pub use server::run_api_server;
