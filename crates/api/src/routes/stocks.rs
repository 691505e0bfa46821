//! # 行情路由控制器
//!
//! 实现 `/api/stocks` 路径下的报价与搜索接口。

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use stockscope_core::market::entity::{SearchResult, StockQuote};

use crate::error::ApiError;
use crate::routes::parse_symbol;
use crate::server::AppState;
use crate::types::ApiResponse;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// 搜索关键字，缺失或空白时返回空列表
    pub q: Option<String>,
}

/// 获取股票报价
///
/// 报价快照缓存 15 分钟，期间重复请求不会访问数据源。
#[utoipa::path(
    get,
    path = "/api/stocks/{symbol}",
    tag = "行情 (Stocks)",
    params(
        ("symbol" = String, Path, description = "股票代码，大小写不敏感")
    ),
    responses(
        (status = 200, description = "报价获取成功", body = ApiResponse<StockQuote>),
        (status = 400, description = "股票代码不合法"),
        (status = 404, description = "数据源无此代码"),
        (status = 502, description = "数据源请求失败")
    )
)]
pub async fn get_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<StockQuote>>, ApiError> {
    let symbol = parse_symbol(&symbol)?;
    let quote = state.dashboard.quote(&symbol).await?;
    Ok(Json(ApiResponse::ok(quote)))
}

/// 搜索股票
///
/// 按代码或公司名称模糊匹配，最多返回 10 条。
#[utoipa::path(
    get,
    path = "/api/stocks/search",
    tag = "行情 (Stocks)",
    params(SearchQuery),
    responses(
        (status = 200, description = "搜索成功", body = ApiResponse<Vec<SearchResult>>),
        (status = 502, description = "数据源请求失败")
    )
)]
pub async fn search_stocks(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<SearchResult>>>, ApiError> {
    let results = state
        .dashboard
        .search(query.q.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(ApiResponse::ok(results)))
}
