//! # 预测路由控制器

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use stockscope_core::analysis::entity::{
    DEFAULT_HORIZON, DEFAULT_WINDOW, ForecastMethod, ForecastOptions,
};

use crate::error::ApiError;
use crate::routes::parse_symbol;
use crate::server::AppState;
use crate::types::{ApiResponse, ForecastRequest, ForecastResponse};

/// 单次请求允许的最大预测天数
pub const MAX_HORIZON: usize = 365;
/// 均线回看窗口上限，与拉取的一年日线长度一致
pub const MAX_WINDOW: usize = 365;

/// 生成价格预测
///
/// 基于最近一年的日线，用移动均值或线性回归外推未来价格，并附带 95% 置信区间。
#[utoipa::path(
    post,
    path = "/api/forecast",
    tag = "分析 (Analysis)",
    request_body = ForecastRequest,
    responses(
        (status = 200, description = "预测成功", body = ApiResponse<ForecastResponse>),
        (status = 400, description = "缺少代码、方法未知或天数超出上限"),
        (status = 404, description = "数据源无此代码"),
        (status = 422, description = "历史数据不足或参数无法用于计算")
    )
)]
pub async fn create_forecast(
    State(state): State<AppState>,
    body: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ForecastResponse>>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let symbol = parse_symbol(req.symbol.as_deref().unwrap_or_default())?;
    let method = match req.method.as_deref() {
        Some(m) => m.parse::<ForecastMethod>().map_err(ApiError::BadRequest)?,
        None => ForecastMethod::Sma,
    };
    let options = ForecastOptions {
        window: bounded("days", req.days.unwrap_or(DEFAULT_WINDOW), MAX_WINDOW)?,
        horizon: bounded("horizon", req.horizon.unwrap_or(DEFAULT_HORIZON), MAX_HORIZON)?,
    };

    let report = state.dashboard.forecast(&symbol, method, options).await?;
    Ok(Json(ApiResponse::ok(ForecastResponse::from(report))))
}

fn bounded(field: &str, value: usize, max: usize) -> Result<usize, ApiError> {
    if value > max {
        return Err(ApiError::BadRequest(format!("{field} must be at most {max}")));
    }
    Ok(value)
}
