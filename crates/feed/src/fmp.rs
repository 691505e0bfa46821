use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use stockscope_core::common::Symbol;
use stockscope_core::config::ProviderConfig;
use stockscope_core::market::entity::{
    FundamentalMetrics, HistoricalPrice, SearchResult, StockQuote, sort_ascending,
};
use stockscope_core::market::error::MarketError;
use stockscope_core::market::port::MarketDataProvider;

/// FMP v3 接口默认地址
pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// # Summary
/// Financial Modeling Prep 行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - `api_key` 只出现在查询参数中，不写入日志。
#[derive(Clone)]
pub struct FmpProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// 接口根地址，不含结尾斜杠
    base_url: String,
    api_key: String,
}

impl FmpProvider {
    /// # Summary
    /// 使用默认地址与 10 秒超时创建 FmpProvider。
    ///
    /// # Arguments
    /// * `api_key`: FMP API Key。
    ///
    /// # Returns
    /// 成功返回 FmpProvider；HTTP 客户端构建失败时返回 `MarketError::Config`。
    pub fn new(api_key: impl Into<String>) -> Result<Self, MarketError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, Duration::from_secs(10))
    }

    /// # Summary
    /// 根据应用配置创建 FmpProvider。
    pub fn from_config(config: &ProviderConfig) -> Result<Self, MarketError> {
        Self::with_base_url(
            config.api_key.clone(),
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// # Summary
    /// 指定接口根地址创建 FmpProvider (测试中指向本地模拟服务)。
    ///
    /// # Logic
    /// 1. 去除根地址结尾的 `/`。
    /// 2. 以给定超时初始化 reqwest 客户端。
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, MarketError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MarketError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// # Summary
    /// 发起 GET 请求并将响应体解析为 JSON。
    ///
    /// # Logic
    /// 1. 校验 API Key 已配置。
    /// 2. 拼接路径与查询参数 (自动附加 `apikey`)。
    /// 3. 非 2xx 状态码映射为 `MarketError::Network`，反序列化失败映射为 `MarketError::Parse`。
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MarketError> {
        if self.api_key.is_empty() {
            return Err(MarketError::Config(
                "FMP API key is not configured".to_string(),
            ));
        }

        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!("FMP request: {}", url);

        let resp = self
            .client
            .get(&url)
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.without_url().to_string()))?;

        if !resp.status().is_success() {
            tracing::warn!("FMP {} returned HTTP {}", path, resp.status());
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        resp.json::<T>()
            .await
            .map_err(|e| MarketError::Parse(e.without_url().to_string()))
    }
}

/// # Summary
/// FMP `/quote` 接口的单条报价。
///
/// # Invariants
/// - 所有数值字段可能为 null 或缺失。
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct FmpQuote {
    symbol: String,
    name: Option<String>,
    price: Option<f64>,
    change: Option<f64>,
    changes_percentage: Option<f64>,
    market_cap: Option<f64>,
    pe: Option<f64>,
    // 股息率
    #[serde(rename = "yield")]
    dividend_yield: Option<f64>,
    year_high: Option<f64>,
    year_low: Option<f64>,
    volume: Option<f64>,
}

/// FMP `/historical-price-full` 响应，未知代码时返回空对象
#[derive(Deserialize, Debug)]
struct FmpHistory {
    #[serde(default)]
    historical: Vec<FmpBar>,
}

/// 单日 OHLCV，FMP 按日期倒序返回
#[derive(Deserialize, Debug)]
struct FmpBar {
    date: String,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct FmpSearchItem {
    symbol: String,
    name: Option<String>,
    currency: Option<String>,
    stock_exchange: Option<String>,
    exchange_short_name: Option<String>,
}

/// FMP `/key-metrics` 年度指标
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct FmpKeyMetrics {
    revenue: Option<f64>,
    net_income: Option<f64>,
    net_income_per_share: Option<f64>,
    roe: Option<f64>,
    debt_to_equity: Option<f64>,
    current_ratio: Option<f64>,
}

impl From<FmpQuote> for StockQuote {
    fn from(q: FmpQuote) -> Self {
        Self {
            symbol: q.symbol,
            company_name: q.name.unwrap_or_default(),
            current_price: q.price.unwrap_or(0.0),
            price_change: q.change.unwrap_or(0.0),
            price_change_percent: q.changes_percentage.unwrap_or(0.0),
            market_cap: q.market_cap.unwrap_or(0.0),
            pe_ratio: q.pe.unwrap_or(0.0),
            dividend_yield: q.dividend_yield.unwrap_or(0.0),
            fifty_two_week_high: q.year_high.unwrap_or(0.0),
            fifty_two_week_low: q.year_low.unwrap_or(0.0),
            volume: q.volume.unwrap_or(0.0),
        }
    }
}

impl From<FmpSearchItem> for SearchResult {
    fn from(item: FmpSearchItem) -> Self {
        Self {
            symbol: item.symbol,
            name: item.name.unwrap_or_default(),
            currency: item.currency,
            stock_exchange: item.stock_exchange,
            exchange_short_name: item.exchange_short_name,
        }
    }
}

impl From<FmpKeyMetrics> for FundamentalMetrics {
    fn from(m: FmpKeyMetrics) -> Self {
        // 缺失的比率记为 NaN：任何分档比较均不成立，落入最低档
        Self {
            roe: m.roe.unwrap_or(f64::NAN),
            debt_to_equity: m.debt_to_equity.unwrap_or(f64::NAN),
            current_ratio: m.current_ratio.unwrap_or(f64::NAN),
            revenue: m.revenue,
            net_income: m.net_income,
            eps: m.net_income_per_share,
        }
    }
}

/// # Summary
/// 将 FMP 倒序日线转为升序历史序列。
///
/// # Logic
/// 1. 取前 `days` 条 (即最近 `days` 个交易日)。
/// 2. 跳过日期无法解析或缺少收盘价的条目，其余缺失字段记为 0。
/// 3. 按日期升序排序。
fn map_history(bars: Vec<FmpBar>, days: usize) -> Vec<HistoricalPrice> {
    let mut prices: Vec<HistoricalPrice> = bars
        .into_iter()
        .take(days)
        .filter_map(|bar| {
            let date = NaiveDate::parse_from_str(bar.date.get(..10)?, "%Y-%m-%d").ok()?;
            Some(HistoricalPrice {
                date,
                open: bar.open.unwrap_or(0.0),
                high: bar.high.unwrap_or(0.0),
                low: bar.low.unwrap_or(0.0),
                close: bar.close?,
                volume: bar.volume.unwrap_or(0.0),
            })
        })
        .collect();
    sort_ascending(&mut prices);
    prices
}

#[async_trait]
impl MarketDataProvider for FmpProvider {
    /// # Summary
    /// 获取报价，取响应数组的第一条。
    async fn fetch_quote(&self, symbol: &Symbol) -> Result<StockQuote, MarketError> {
        let quotes: Vec<FmpQuote> = self
            .get_json(&format!("quote/{}", symbol), &[])
            .await?;

        quotes
            .into_iter()
            .next()
            .map(StockQuote::from)
            .ok_or_else(|| MarketError::NotFound(symbol.to_string()))
    }

    /// # Summary
    /// 获取最近 `days` 个交易日的日线并升序返回。
    async fn fetch_history(
        &self,
        symbol: &Symbol,
        days: usize,
    ) -> Result<Vec<HistoricalPrice>, MarketError> {
        let history: FmpHistory = self
            .get_json(&format!("historical-price-full/{}", symbol), &[])
            .await?;

        let prices = map_history(history.historical, days);
        if prices.is_empty() {
            return Err(MarketError::NotFound(symbol.to_string()));
        }
        tracing::debug!("FMP history for {}: {} bars", symbol, prices.len());
        Ok(prices)
    }

    /// # Summary
    /// 关键字搜索。
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, MarketError> {
        let limit = limit.to_string();
        let items: Vec<FmpSearchItem> = self
            .get_json("search", &[("query", query), ("limit", limit.as_str())])
            .await?;

        Ok(items.into_iter().map(SearchResult::from).collect())
    }

    /// # Summary
    /// 获取最近一个年度的关键指标，空数组返回 None。
    async fn fetch_metrics(
        &self,
        symbol: &Symbol,
    ) -> Result<Option<FundamentalMetrics>, MarketError> {
        let metrics: Vec<FmpKeyMetrics> = self
            .get_json(&format!("key-metrics/{}", symbol), &[("period", "annual")])
            .await?;

        Ok(metrics.into_iter().next().map(FundamentalMetrics::from))
    }
}
