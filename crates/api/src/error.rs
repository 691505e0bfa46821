//! # API 统一错误处理
//!
//! 将下层各 crate 的错误类型统一映射到 HTTP 状态码与 JSON 响应体。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use stockscope_core::insight::error::InsightError;
use stockscope_core::market::error::MarketError;
use stockscope_manager::dashboard::ManagerError;

use crate::types::ApiErrorResponse;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 请求参数错误 (400)
    #[error("请求参数错误: {0}")]
    BadRequest(String),

    /// 资源未找到 (404)
    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 参数合法但无法据此计算，如历史数据不足 (422)
    #[error("无法处理的请求: {0}")]
    Unprocessable(String),

    /// 上游数据源或模型服务失败 (502)
    #[error("上游服务错误: {0}")]
    BadGateway(String),

    /// 可选功能未配置 (500)，信息原样返回给客户端
    #[error("功能未配置: {0}")]
    NotConfigured(String),

    /// 下层业务错误 (500)
    #[error("内部服务错误: {0}")]
    Internal(String),
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ApiError::BadGateway(msg) => {
                tracing::warn!("上游服务错误: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            ApiError::NotConfigured(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ApiError::Internal(msg) => {
                // 内部错误只记录日志，不向客户端透传细节
                tracing::error!("内部服务错误: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ApiErrorResponse::from_msg(message));
        (status, body).into_response()
    }
}

/// 从 `ManagerError` 转换
impl From<ManagerError> for ApiError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::Market(e) => match e {
                MarketError::NotFound(_) => ApiError::NotFound(e.to_string()),
                MarketError::Network(_) | MarketError::Parse(_) => {
                    ApiError::BadGateway(format!("Failed to fetch market data: {}", e))
                }
                MarketError::Config(_) | MarketError::Unknown(_) => {
                    ApiError::Internal(e.to_string())
                }
            },
            ManagerError::Forecast(e) => ApiError::Unprocessable(e.to_string()),
            ManagerError::Insight(e) => match e {
                InsightError::NotConfigured => ApiError::NotConfigured(e.to_string()),
                InsightError::Upstream { status, body } => {
                    ApiError::BadGateway(format!("OpenAI request failed ({}): {}", status, body))
                }
                InsightError::Network(_) | InsightError::Parse(_) => {
                    ApiError::BadGateway(format!("OpenAI request failed: {}", e))
                }
            },
        }
    }
}
