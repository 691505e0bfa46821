use crate::market::entity::StockQuote;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// 均线法默认的回看窗口 (交易日)
pub const DEFAULT_WINDOW: usize = 30;
/// 默认预测步数 (自然日)
pub const DEFAULT_HORIZON: usize = 30;

/// # Summary
/// 价格外推方法枚举，封闭的两种策略。
///
/// # Invariants
/// - 线上字符串表示固定为 `"sma"` / `"linear"`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMethod {
    // 移动均值 + 趋势漂移
    Sma,
    // 普通最小二乘线性回归
    Linear,
}

impl FromStr for ForecastMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sma" => Ok(ForecastMethod::Sma),
            "linear" => Ok(ForecastMethod::Linear),
            _ => Err(format!("Unknown forecast method: {}", s)),
        }
    }
}

impl std::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastMethod::Sma => write!(f, "sma"),
            ForecastMethod::Linear => write!(f, "linear"),
        }
    }
}

/// # Summary
/// 预测参数。
///
/// # Invariants
/// - `window` 与 `horizon` 必须为正整数，由预测引擎在入口校验。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastOptions {
    // 均线法使用的尾部窗口长度，序列不足时取全部
    pub window: usize,
    // 输出的预测点数量
    pub horizon: usize,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            horizon: DEFAULT_HORIZON,
        }
    }
}

/// # Summary
/// 单日预测点，创建后不再修改。
///
/// # Invariants
/// - `0 <= confidence_lower`，`predicted_price >= 0`，`confidence_upper >= predicted_price`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_price: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
}

/// # Summary
/// 评分引擎所需的报价快照子集。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSnapshot {
    pub pe_ratio: f64,
    pub price_change_percent: f64,
    pub dividend_yield: f64,
    pub current_price: f64,
    pub fifty_two_week_high: f64,
    pub fifty_two_week_low: f64,
}

impl From<&StockQuote> for QuoteSnapshot {
    fn from(q: &StockQuote) -> Self {
        Self {
            pe_ratio: q.pe_ratio,
            price_change_percent: q.price_change_percent,
            dividend_yield: q.dividend_yield,
            current_price: q.current_price,
            fifty_two_week_high: q.fifty_two_week_high,
            fifty_two_week_low: q.fifty_two_week_low,
        }
    }
}

/// # Summary
/// 评分结果。
///
/// # Invariants
/// - 每个字段都在 `[0, 100]` 区间内。
/// - `overall` 由其余三项加权得出，不单独存储。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct ScoreSet {
    #[schema(example = 70)]
    pub value: u8,
    #[schema(example = 60)]
    pub health: u8,
    #[schema(example = 45)]
    pub momentum: u8,
    #[schema(example = 59)]
    pub overall: u8,
}
