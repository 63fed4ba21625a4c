//! Finsight API Server module
//!
//! HTTP REST API over the analysis engine. Run with `finsight-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState};
