use axum::extract::State;
use axum::Json;

use crate::server::AppState;
use crate::types::{ApiResponse, HealthResponse};

/// 存活探针
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "系统 (System)",
    responses(
        (status = 200, description = "服务存活", body = ApiResponse<HealthResponse>)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        insight_enabled: state.dashboard.insight_enabled(),
    }))
}
