//! # 评分路由控制器

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::routes::parse_symbol;
use crate::server::AppState;
use crate::types::{AnalysisResponse, ApiResponse};

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalysisQuery {
    /// 股票代码
    pub symbol: Option<String>,
}

/// 计算价值、健康、动量与综合评分
///
/// 基本面指标不可用时健康分取中性值 50，其余评分不受影响。
#[utoipa::path(
    get,
    path = "/api/analysis",
    tag = "分析 (Analysis)",
    params(AnalysisQuery),
    responses(
        (status = 200, description = "评分成功", body = ApiResponse<AnalysisResponse>),
        (status = 400, description = "缺少股票代码"),
        (status = 404, description = "数据源无此代码")
    )
)]
pub async fn get_analysis(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<ApiResponse<AnalysisResponse>>, ApiError> {
    let symbol = parse_symbol(query.symbol.as_deref().unwrap_or_default())?;
    let report = state.dashboard.analyze(&symbol).await?;
    Ok(Json(ApiResponse::ok(AnalysisResponse::from(report))))
}
