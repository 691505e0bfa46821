//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为面向前端 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use stockscope_core::analysis::entity::{ForecastPoint, ScoreSet};
use stockscope_core::market::entity::{FundamentalMetrics, HistoricalPrice, StockQuote};
use stockscope_manager::dashboard::{AnalysisReport, ForecastReport};

// ============================================================
//  预测相关 DTO
// ============================================================

/// 预测请求体
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ForecastRequest {
    /// 股票代码
    #[schema(example = "AAPL")]
    pub symbol: Option<String>,
    /// 外推方法 (`sma` / `linear`)，默认 `sma`
    #[schema(example = "sma")]
    pub method: Option<String>,
    /// 均线法回看窗口 (交易日)，默认 30
    #[schema(example = 30)]
    pub days: Option<usize>,
    /// 预测天数，默认 30
    #[schema(example = 30)]
    pub horizon: Option<usize>,
}

/// 置信区间
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfidenceBand {
    #[schema(example = 180.2)]
    pub lower: f64,
    #[schema(example = 195.8)]
    pub upper: f64,
}

/// 单日预测点 DTO，与前端图表约定的结构
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPointResponse {
    /// 预测日期 (YYYY-MM-DD)
    #[schema(value_type = String, example = "2024-07-01")]
    pub date: NaiveDate,
    /// 预测价格
    #[schema(example = 188.0)]
    pub predicted_price: f64,
    pub confidence: ConfidenceBand,
}

impl From<ForecastPoint> for ForecastPointResponse {
    fn from(p: ForecastPoint) -> Self {
        Self {
            date: p.date,
            predicted_price: p.predicted_price,
            confidence: ConfidenceBand {
                lower: p.confidence_lower,
                upper: p.confidence_upper,
            },
        }
    }
}

/// 预测结果 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForecastResponse {
    #[schema(example = "AAPL")]
    pub symbol: String,
    #[schema(example = "sma")]
    pub method: String,
    /// 最近 90 个交易日的历史价格 (升序)
    pub historical: Vec<HistoricalPrice>,
    pub forecast: Vec<ForecastPointResponse>,
}

impl From<ForecastReport> for ForecastResponse {
    fn from(r: ForecastReport) -> Self {
        Self {
            symbol: r.symbol.to_string(),
            method: r.method.to_string(),
            historical: r.historical,
            forecast: r.forecast.into_iter().map(ForecastPointResponse::from).collect(),
        }
    }
}

// ============================================================
//  评分相关 DTO
// ============================================================

/// 评分分析结果 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResponse {
    #[schema(example = "AAPL")]
    pub symbol: String,
    pub scores: ScoreSet,
    /// 基本面指标，数据源无数据时为 null
    pub metrics: Option<FundamentalMetrics>,
    pub quote: StockQuote,
}

impl From<AnalysisReport> for AnalysisResponse {
    fn from(r: AnalysisReport) -> Self {
        Self {
            symbol: r.symbol.to_string(),
            scores: r.scores,
            metrics: r.metrics,
            quote: r.quote,
        }
    }
}

/// 解读请求体
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ExplainRequest {
    #[schema(example = "AAPL")]
    pub symbol: Option<String>,
    pub scores: Option<ScoreSet>,
}

// ============================================================
//  系统 DTO
// ============================================================

/// 存活探针响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    /// 是否已配置大模型解读
    pub insight_enabled: bool,
}

// ============================================================
//  通用响应 DTO
// ============================================================

/// 统一 API 响应包装器
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T: Serialize + ToSchema> {
    /// 是否成功
    pub success: bool,
    /// 数据载荷 (成功时)
    pub data: Option<T>,
    /// 错误信息 (失败时)
    pub error: Option<String>,
}

impl<T: Serialize + ToSchema> ApiResponse<T> {
    /// 构建成功响应
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// 构建失败响应 (不含泛型载荷)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub success: bool,
    /// 错误描述信息
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}
