use crate::common::Symbol;
use crate::market::entity::{FundamentalMetrics, HistoricalPrice, SearchResult, StockQuote};
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 第三方行情数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 实现者只负责取数与字段映射，不做缓存、不做评分。
/// - 返回的历史序列必须已按日期升序排列。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取证券的最新报价快照。
    ///
    /// # Logic
    /// 1. 请求数据源报价接口。
    /// 2. 将数据源字段映射为 `StockQuote`，缺失的数值字段按 0 处理。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    ///
    /// # Returns
    /// 成功返回报价；数据源无该证券时返回 `MarketError::NotFound`。
    async fn fetch_quote(&self, symbol: &Symbol) -> Result<StockQuote, MarketError>;

    /// # Summary
    /// 获取最近 `days` 个交易日的日线历史。
    ///
    /// # Logic
    /// 1. 请求数据源历史接口并截取最近 `days` 条。
    /// 2. 按日期升序排列后返回。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `days`: 回溯的交易日数量上限。
    ///
    /// # Returns
    /// 成功返回升序的历史行情列表。
    async fn fetch_history(
        &self,
        symbol: &Symbol,
        days: usize,
    ) -> Result<Vec<HistoricalPrice>, MarketError>;

    /// # Summary
    /// 按关键字搜索证券。
    ///
    /// # Arguments
    /// * `query`: 搜索关键字 (代码或公司名)。
    /// * `limit`: 返回条目上限。
    ///
    /// # Returns
    /// 成功返回匹配条目列表 (可能为空)。
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, MarketError>;

    /// # Summary
    /// 获取最近一个年度的基本面指标。
    ///
    /// # Returns
    /// 数据源没有该证券的指标时返回 `Ok(None)`。
    async fn fetch_metrics(
        &self,
        symbol: &Symbol,
    ) -> Result<Option<FundamentalMetrics>, MarketError>;
}
