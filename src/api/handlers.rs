//! API request handlers
//!
//! Analysis work is CPU-bound and touches the filesystem, so every POST handler runs it
//! on the blocking pool.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::core::{analyze as run_analysis, compare as run_comparison, forecast as run_forecast};
use crate::core::{AnalysisReport, ComparisonResult, ForecastSeries};
use crate::error::{FinsightError, FinsightResult};
use crate::loader::{load_table, load_tables};

use super::server::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// HTTP status for a failed analysis request
pub fn status_for(error: &FinsightError) -> StatusCode {
    match error {
        FinsightError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
        FinsightError::Io(_) | FinsightError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        FinsightError::UnknownColumn(_)
        | FinsightError::NotNumeric(_)
        | FinsightError::InvalidInput(_)
        | FinsightError::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_REQUEST,
    }
}

/// Run `job` on the blocking pool and wrap its outcome
async fn run_blocking<T, F>(job: F) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize + Send + 'static,
    F: FnOnce() -> FinsightResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(Ok(data)) => (StatusCode::OK, Json(ApiResponse::ok(data))),
        Ok(Err(e)) => {
            warn!(error = %e, "request failed");
            (status_for(&e), Json(ApiResponse::err(e.to_string())))
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::err(format!("Worker task failed: {}", e))),
        ),
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Finsight API Server".to_string(),
        version: state.version.clone(),
        description: "Financial table analysis over HTTP".to_string(),
        endpoints: vec![
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new("POST", "/api/v1/analyze", "Ratios, trends and correlations for a table"),
            EndpointInfo::new("POST", "/api/v1/forecast", "Linear forecast of one column"),
            EndpointInfo::new("POST", "/api/v1/compare", "Compare tables against the first"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "analyze".to_string(),
            "forecast".to_string(),
            "compare".to_string(),
        ],
    }))
}

/// Analyze request
#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub file_path: String,
}

/// POST /api/v1/analyze - Analyze one table
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> (StatusCode, Json<ApiResponse<AnalysisReport>>) {
    let path = PathBuf::from(req.file_path);
    run_blocking(move || {
        let table = load_table(&path, &state.config)?;
        Ok(run_analysis(&table, &state.config))
    })
    .await
}

/// Forecast request
#[derive(Deserialize)]
pub struct ForecastRequest {
    pub file_path: String,
    pub column: String,
    #[serde(default)]
    pub periods: Option<usize>,
}

/// POST /api/v1/forecast - Forecast one column
pub async fn forecast(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForecastRequest>,
) -> (StatusCode, Json<ApiResponse<ForecastSeries>>) {
    let path = PathBuf::from(req.file_path);
    let periods = req.periods.unwrap_or(state.config.forecast_periods);
    run_blocking(move || {
        let table = load_table(&path, &state.config)?;
        run_forecast(&table, &req.column, periods)
    })
    .await
}

/// Compare request
#[derive(Deserialize)]
pub struct CompareRequest {
    pub file_paths: Vec<String>,
}

/// POST /api/v1/compare - Compare tables against the first
pub async fn compare(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CompareRequest>,
) -> (StatusCode, Json<ApiResponse<ComparisonResult>>) {
    run_blocking(move || {
        if req.file_paths.len() < 2 {
            return Err(FinsightError::InvalidInput(
                "file_paths needs at least two entries".to_string(),
            ));
        }
        let tables = load_tables(&req.file_paths, &state.config)?;
        run_comparison(&tables, state.config.zero_variance)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== ApiResponse Tests ====================

    #[test]
    fn test_api_response_ok_creates_success_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test data".to_string());

        assert!(response.success);
        assert_eq!(response.data, Some("test data".to_string()));
        assert!(response.error.is_none());
        // Verify UUID format (8-4-4-4-12)
        assert_eq!(response.request_id.len(), 36);
    }

    #[test]
    fn test_api_response_err_creates_error_response() {
        let response: ApiResponse<AnalysisReport> = ApiResponse::err("Something went wrong");

        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error, Some("Something went wrong".to_string()));
    }

    #[test]
    fn test_api_response_request_id_is_unique() {
        let response1: ApiResponse<String> = ApiResponse::ok("test1".to_string());
        let response2: ApiResponse<String> = ApiResponse::ok("test2".to_string());

        assert_ne!(response1.request_id, response2.request_id);
    }

    #[test]
    fn test_error_body_omits_data() {
        let response: ApiResponse<String> = ApiResponse::err("boom");
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["error"], "boom");
    }

    // ==================== Status Mapping Tests ====================

    #[test]
    fn test_status_for_errors() {
        let missing = FinsightError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(status_for(&missing), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&FinsightError::UnknownColumn("x".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&FinsightError::UnsupportedFormat("pdf".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&FinsightError::Export("disk".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    // ==================== Request Deserialization Tests ====================

    #[test]
    fn test_forecast_request_periods_optional() {
        let req: ForecastRequest =
            serde_json::from_str(r#"{"file_path": "q.csv", "column": "revenue"}"#).unwrap();
        assert_eq!(req.column, "revenue");
        assert!(req.periods.is_none());
    }

    #[test]
    fn test_compare_request_deserialize() {
        let req: CompareRequest =
            serde_json::from_str(r#"{"file_paths": ["a.csv", "b.csv"]}"#).unwrap();
        assert_eq!(req.file_paths.len(), 2);
    }
}
