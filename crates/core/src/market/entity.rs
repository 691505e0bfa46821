use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// # Summary
/// 单日历史行情实体 (OHLCV)。
///
/// # Invariants
/// - `open` / `high` / `low` / `close` / `volume` 均为非负数。
/// - 序列在使用前必须经过 `sort_ascending` 显式排序，数据源给出的顺序不可信任。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoricalPrice {
    // 交易日 (ISO 8601, 如 2024-01-02)
    #[schema(value_type = String, example = "2024-01-02")]
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    // 收盘价，预测引擎唯一读取的字段
    pub close: f64,
    pub volume: f64,
}

/// 按日期升序就地排序 (稳定排序，同日数据保持原有相对顺序)
pub fn sort_ascending(prices: &mut [HistoricalPrice]) {
    prices.sort_by_key(|p| p.date);
}

/// # Summary
/// 报价快照实体，代表某一时刻的价格与估值信息。
///
/// # Invariants
/// - `fifty_two_week_high >= fifty_two_week_low` 为预期但不强制校验。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    #[schema(example = "AAPL")]
    pub symbol: String,
    #[schema(example = "Apple Inc.")]
    pub company_name: String,
    pub current_price: f64,
    pub price_change: f64,
    pub price_change_percent: f64,
    pub market_cap: f64,
    // 市盈率，非正数表示不可用
    pub pe_ratio: f64,
    pub dividend_yield: f64,
    pub fifty_two_week_high: f64,
    pub fifty_two_week_low: f64,
    pub volume: f64,
}

/// # Summary
/// 公司基本面指标，作为健康度评分的输入。
///
/// # Invariants
/// - 所有比率为小数形式 (ROE 0.15 即 15%)。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalMetrics {
    // 净资产收益率
    pub roe: f64,
    // 负债权益比
    pub debt_to_equity: f64,
    // 流动比率
    pub current_ratio: f64,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
    // 每股收益
    pub eps: Option<f64>,
}

/// 证券搜索结果条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[schema(example = "AAPL")]
    pub symbol: String,
    #[schema(example = "Apple Inc.")]
    pub name: String,
    pub currency: Option<String>,
    pub stock_exchange: Option<String>,
    #[schema(example = "NASDAQ")]
    pub exchange_short_name: Option<String>,
}
