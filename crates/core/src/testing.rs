//! # 测试替身
//!
//! 供下游 crate 的集成测试使用的端口实现，通过 `test-utils` feature 开启。

use crate::analysis::entity::ScoreSet;
use crate::common::Symbol;
use crate::insight::entity::Insight;
use crate::insight::error::InsightError;
use crate::insight::port::InsightProvider;
use crate::market::entity::{
    FundamentalMetrics, HistoricalPrice, SearchResult, StockQuote, sort_ascending,
};
use crate::market::error::MarketError;
use crate::market::port::MarketDataProvider;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// # Summary
/// 基于内存预置数据的行情提供者，并记录各接口的调用次数。
#[derive(Default)]
pub struct StaticMarketProvider {
    quotes: DashMap<String, StockQuote>,
    history: DashMap<String, Vec<HistoricalPrice>>,
    metrics: DashMap<String, FundamentalMetrics>,
    metrics_fail: AtomicBool,
    pub quote_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub metrics_calls: AtomicUsize,
}

impl StaticMarketProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(self, quote: StockQuote) -> Self {
        self.quotes.insert(quote.symbol.to_uppercase(), quote);
        self
    }

    pub fn with_history(self, symbol: &str, prices: Vec<HistoricalPrice>) -> Self {
        self.history.insert(symbol.to_uppercase(), prices);
        self
    }

    pub fn with_metrics(self, symbol: &str, metrics: FundamentalMetrics) -> Self {
        self.metrics.insert(symbol.to_uppercase(), metrics);
        self
    }

    /// 令 `fetch_metrics` 始终返回网络错误
    pub fn failing_metrics(self) -> Self {
        self.metrics_fail.store(true, Ordering::SeqCst);
        self
    }

    /// 构造一条字段齐全的报价，便于测试按需覆盖
    pub fn sample_quote(symbol: &str, price: f64, low: f64, high: f64, pe: f64) -> StockQuote {
        StockQuote {
            symbol: symbol.to_uppercase(),
            company_name: format!("{} Corp.", symbol.to_uppercase()),
            current_price: price,
            price_change: 0.0,
            price_change_percent: 0.0,
            market_cap: 1.0e9,
            pe_ratio: pe,
            dividend_yield: 0.0,
            fifty_two_week_high: high,
            fifty_two_week_low: low,
            volume: 1.0e6,
        }
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketProvider {
    async fn fetch_quote(&self, symbol: &Symbol) -> Result<StockQuote, MarketError> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        self.quotes
            .get(symbol.as_str())
            .map(|q| q.value().clone())
            .ok_or_else(|| MarketError::NotFound(symbol.to_string()))
    }

    async fn fetch_history(
        &self,
        symbol: &Symbol,
        days: usize,
    ) -> Result<Vec<HistoricalPrice>, MarketError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        let mut prices = self
            .history
            .get(symbol.as_str())
            .map(|h| h.value().clone())
            .ok_or_else(|| MarketError::NotFound(symbol.to_string()))?;
        sort_ascending(&mut prices);
        let skip = prices.len().saturating_sub(days);
        Ok(prices.split_off(skip))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, MarketError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let needle = query.to_lowercase();
        let mut results: Vec<SearchResult> = self
            .quotes
            .iter()
            .filter(|q| {
                q.symbol.to_lowercase().contains(&needle)
                    || q.company_name.to_lowercase().contains(&needle)
            })
            .map(|q| SearchResult {
                symbol: q.symbol.clone(),
                name: q.company_name.clone(),
                currency: Some("USD".to_string()),
                stock_exchange: None,
                exchange_short_name: None,
            })
            .collect();
        results.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        results.truncate(limit);
        Ok(results)
    }

    async fn fetch_metrics(
        &self,
        symbol: &Symbol,
    ) -> Result<Option<FundamentalMetrics>, MarketError> {
        self.metrics_calls.fetch_add(1, Ordering::SeqCst);
        if self.metrics_fail.load(Ordering::SeqCst) {
            return Err(MarketError::Network("metrics endpoint unavailable".to_string()));
        }
        Ok(self.metrics.get(symbol.as_str()).map(|m| m.value().clone()))
    }
}

/// # Summary
/// 返回固定结果的解读服务，并记录最后一次请求的分数。
pub struct CannedInsightProvider {
    response: Result<Insight, u16>,
    pub last_scores: DashMap<String, ScoreSet>,
}

impl CannedInsightProvider {
    /// 始终返回给定解读
    pub fn ok(insight: Insight) -> Self {
        Self {
            response: Ok(insight),
            last_scores: DashMap::new(),
        }
    }

    /// 始终模拟模型服务返回指定 HTTP 状态码
    pub fn failing(status: u16) -> Self {
        Self {
            response: Err(status),
            last_scores: DashMap::new(),
        }
    }
}

#[async_trait]
impl InsightProvider for CannedInsightProvider {
    async fn explain(&self, symbol: &Symbol, scores: &ScoreSet) -> Result<Insight, InsightError> {
        self.last_scores.insert(symbol.to_string(), *scores);
        match &self.response {
            Ok(insight) => Ok(insight.clone()),
            Err(status) => Err(InsightError::Upstream {
                status: *status,
                body: "canned failure".to_string(),
            }),
        }
    }
}
