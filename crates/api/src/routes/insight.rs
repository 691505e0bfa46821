//! # 大模型解读路由控制器

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use stockscope_core::insight::entity::Insight;
use stockscope_core::insight::error::InsightError;

use crate::error::ApiError;
use crate::routes::parse_symbol;
use crate::server::AppState;
use crate::types::{ApiResponse, ExplainRequest};

/// 生成评分的教育性解读
///
/// 需要配置 OpenAI API Key；未配置时无论请求体如何均返回 500。
#[utoipa::path(
    post,
    path = "/api/ai/explain",
    tag = "解读 (Insight)",
    request_body = ExplainRequest,
    responses(
        (status = 200, description = "解读成功", body = ApiResponse<Insight>),
        (status = 400, description = "缺少代码或评分"),
        (status = 500, description = "未配置 OpenAI API Key"),
        (status = 502, description = "模型服务请求失败")
    )
)]
pub async fn explain_scores(
    State(state): State<AppState>,
    body: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Insight>>, ApiError> {
    if !state.dashboard.insight_enabled() {
        return Err(ApiError::NotConfigured(InsightError::NotConfigured.to_string()));
    }

    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let (Some(symbol), Some(scores)) = (req.symbol, req.scores) else {
        return Err(ApiError::BadRequest("symbol and scores are required".to_string()));
    };
    let symbol = parse_symbol(&symbol)?;

    let insight = state.dashboard.explain(&symbol, &scores).await?;
    Ok(Json(ApiResponse::ok(insight)))
}
