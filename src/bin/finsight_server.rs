//! Finsight API Server binary
//!
//! HTTP REST API for financial table analysis.

use clap::Parser;
use finsight::api::{run_api_server, ApiConfig};
use finsight::config::AnalysisConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "finsight-server")]
#[command(version)]
#[command(about = "Finsight API Server - HTTP REST API for financial table analysis")]
#[command(long_about = r#"
Finsight API Server - HTTP REST API

Provides RESTful endpoints over files readable by the server:
  - POST /api/v1/analyze   - Ratios, trends and correlation matrix
  - POST /api/v1/forecast  - Linear forecast of one column
  - POST /api/v1/compare   - Compare tables against the first

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Features:
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM
  - JSON response format with request IDs
  - Tracing and structured logging (RUST_LOG)

Example usage:
  finsight-server                           # Start on localhost:8080
  finsight-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/analyze \
    -H "Content-Type: application/json" \
    -d '{"file_path": "quarterly.csv"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "FINSIGHT_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "FINSIGHT_PORT")]
    port: u16,

    /// Analysis settings file (YAML)
    #[arg(short, long, env = "FINSIGHT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        analysis: AnalysisConfig::load_or_default(args.config.as_deref())?,
    };

    run_api_server(config).await
}
