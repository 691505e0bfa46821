use chrono::TimeDelta;
use serde::Serialize;
use std::sync::Arc;
use stockscope_analysis::{forecast, score};
use stockscope_core::analysis::entity::{
    ForecastMethod, ForecastOptions, ForecastPoint, QuoteSnapshot, ScoreSet,
};
use stockscope_core::analysis::error::ForecastError;
use stockscope_core::cache::port::{Cache, CacheExt};
use stockscope_core::common::Symbol;
use stockscope_core::config::CacheConfig;
use stockscope_core::insight::entity::Insight;
use stockscope_core::insight::error::InsightError;
use stockscope_core::insight::port::InsightProvider;
use stockscope_core::market::entity::{
    FundamentalMetrics, HistoricalPrice, SearchResult, StockQuote,
};
use stockscope_core::market::error::MarketError;
use stockscope_core::market::port::MarketDataProvider;
use thiserror::Error;
use tracing::{debug, info, warn};

/// # Summary
/// Manager 层的统一错误类型。
#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("Market error: {0}")]
    Market(#[from] MarketError),
    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),
    #[error("Insight error: {0}")]
    Insight(#[from] InsightError),
}

/// # Summary
/// 看板用例的可调参数。
#[derive(Debug, Clone, Copy)]
pub struct DashboardOptions {
    // 报价快照缓存的存活时长
    pub quote_ttl: TimeDelta,
    // 预测时向数据源请求的日线数量
    pub history_days: usize,
    // 预测结果中附带的历史点数量
    pub historical_tail: usize,
    // 搜索结果上限
    pub search_limit: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            quote_ttl: TimeDelta::minutes(15),
            history_days: 365,
            historical_tail: 90,
            search_limit: 10,
        }
    }
}

impl DashboardOptions {
    /// 以缓存配置覆盖默认的报价存活时长
    pub fn from_config(config: &CacheConfig) -> Self {
        let secs = i64::try_from(config.quote_ttl_secs).unwrap_or(i64::MAX);
        Self {
            quote_ttl: TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX),
            ..Self::default()
        }
    }
}

/// # Summary
/// 价格预测结果，包含用于绘图的近期历史。
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub symbol: Symbol,
    pub method: ForecastMethod,
    // 升序排列的最近若干个历史点
    pub historical: Vec<HistoricalPrice>,
    pub forecast: Vec<ForecastPoint>,
}

/// # Summary
/// 单只证券的评分分析结果。
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub symbol: Symbol,
    pub scores: ScoreSet,
    // 指标接口失败或无数据时为 None，此时健康分取中性值
    pub metrics: Option<FundamentalMetrics>,
    pub quote: StockQuote,
}

/// # Summary
/// 看板应用服务，系统的用例门面 (Facade)。
/// 编译期仅依赖 `stockscope-core` 中的 Trait 定义，所有具体实现通过构造函数注入。
///
/// # Invariants
/// - 缓存写入失败只记录告警，不影响请求结果。
/// - 未注入解读服务时，解读用例返回 `InsightError::NotConfigured`。
pub struct DashboardService {
    // 行情数据源
    provider: Arc<dyn MarketDataProvider>,
    // 报价快照缓存
    cache: Arc<dyn Cache>,
    // 可选的大模型解读服务
    insight: Option<Arc<dyn InsightProvider>>,
    options: DashboardOptions,
}

fn quote_key(symbol: &Symbol) -> String {
    format!("quote:{}", symbol)
}

impl DashboardService {
    /// # Summary
    /// 创建 DashboardService 实例。
    ///
    /// # Arguments
    /// * `provider` - 行情数据源的具体实现。
    /// * `cache` - 缓存的具体实现。
    /// * `insight` - 解读服务，未配置 API Key 时传入 None。
    /// * `options` - 用例参数。
    ///
    /// # Returns
    /// * `Arc<Self>` - 可共享的服务实例。
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        cache: Arc<dyn Cache>,
        insight: Option<Arc<dyn InsightProvider>>,
        options: DashboardOptions,
    ) -> Arc<Self> {
        Arc::new(Self {
            provider,
            cache,
            insight,
            options,
        })
    }

    pub fn insight_enabled(&self) -> bool {
        self.insight.is_some()
    }

    /// # Summary
    /// 获取报价快照，优先读取缓存。
    ///
    /// # Logic
    /// 1. 以 `quote:{SYMBOL}` 查询缓存，命中且未过期则直接返回。
    /// 2. 未命中时请求数据源。
    /// 3. 尽力写回缓存，失败仅记录告警。
    pub async fn quote(&self, symbol: &Symbol) -> Result<StockQuote, ManagerError> {
        let key = quote_key(symbol);

        match self.cache.get::<StockQuote>(&key).await {
            Ok(Some(quote)) => {
                debug!("Quote cache hit for {}", symbol);
                return Ok(quote);
            }
            Ok(None) => {}
            Err(e) => warn!("Quote cache read failed for {}: {}", symbol, e),
        }

        let quote = self.provider.fetch_quote(symbol).await?;
        if let Err(e) = self.cache.set(&key, &quote, self.options.quote_ttl).await {
            warn!("Quote cache write failed for {}: {}", symbol, e);
        }
        Ok(quote)
    }

    /// # Summary
    /// 关键字搜索证券。
    ///
    /// # Logic
    /// 1. 空白关键字直接返回空列表，不请求数据源。
    /// 2. 否则按 `search_limit` 转发给数据源。
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ManagerError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.provider.search(query, self.options.search_limit).await?)
    }

    /// # Summary
    /// 生成价格预测。
    ///
    /// # Logic
    /// 1. 拉取最近 `history_days` 个交易日的日线。
    /// 2. 调用预测引擎外推。
    /// 3. 截取最近 `historical_tail` 个历史点随结果返回。
    pub async fn forecast(
        &self,
        symbol: &Symbol,
        method: ForecastMethod,
        options: ForecastOptions,
    ) -> Result<ForecastReport, ManagerError> {
        let mut history = self
            .provider
            .fetch_history(symbol, self.options.history_days)
            .await?;

        let points = forecast(&history, method, options)?;
        info!(
            "Forecast {} via {}: {} history points, {} predicted",
            symbol,
            method,
            history.len(),
            points.len()
        );

        let skip = history.len().saturating_sub(self.options.historical_tail);
        let historical = history.split_off(skip);

        Ok(ForecastReport {
            symbol: symbol.clone(),
            method,
            historical,
            forecast: points,
        })
    }

    /// # Summary
    /// 计算单只证券的评分。
    ///
    /// # Logic
    /// 1. 并发获取报价 (走缓存) 与基本面指标。
    /// 2. 报价失败则整体失败；指标失败降级为 None。
    /// 3. 调用评分引擎。
    pub async fn analyze(&self, symbol: &Symbol) -> Result<AnalysisReport, ManagerError> {
        let (quote, metrics) = tokio::join!(self.quote(symbol), self.provider.fetch_metrics(symbol));
        let quote = quote?;

        let metrics = match metrics {
            Ok(m) => m,
            Err(e) => {
                warn!("Metrics unavailable for {}, scoring without them: {}", symbol, e);
                None
            }
        };

        let scores = score(&QuoteSnapshot::from(&quote), metrics.as_ref());
        debug!("Scores for {}: {:?}", symbol, scores);

        Ok(AnalysisReport {
            symbol: symbol.clone(),
            scores,
            metrics,
            quote,
        })
    }

    /// # Summary
    /// 请求大模型解读评分。
    ///
    /// # Returns
    /// * 未配置解读服务时返回 `InsightError::NotConfigured`。
    pub async fn explain(
        &self,
        symbol: &Symbol,
        scores: &ScoreSet,
    ) -> Result<Insight, ManagerError> {
        let provider = self.insight.as_ref().ok_or(InsightError::NotConfigured)?;
        Ok(provider.explain(symbol, scores).await?)
    }
}
