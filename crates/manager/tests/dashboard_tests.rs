use async_trait::async_trait;
use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use stockscope_cache::mem::MemCache;
use stockscope_core::analysis::entity::{ForecastMethod, ForecastOptions, ScoreSet};
use stockscope_core::analysis::error::ForecastError;
use stockscope_core::cache::error::CacheError;
use stockscope_core::cache::port::Cache;
use stockscope_core::common::Symbol;
use stockscope_core::common::time::FakeClockProvider;
use stockscope_core::insight::entity::Insight;
use stockscope_core::insight::error::InsightError;
use stockscope_core::insight::port::InsightProvider;
use stockscope_core::market::entity::{FundamentalMetrics, HistoricalPrice};
use stockscope_core::market::error::MarketError;
use stockscope_core::testing::{CannedInsightProvider, StaticMarketProvider};
use stockscope_manager::dashboard::{DashboardOptions, DashboardService, ManagerError};

/// 所有操作都失败的缓存，用于验证缓存故障不影响请求
struct BrokenCache;

#[async_trait]
impl Cache for BrokenCache {
    async fn set_raw(&self, _key: &str, _value: Vec<u8>, _ttl: TimeDelta) -> Result<(), CacheError> {
        Err(CacheError::Storage("disk full".to_string()))
    }

    async fn get_raw(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(CacheError::Storage("disk full".to_string()))
    }

    async fn del(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Storage("disk full".to_string()))
    }
}

fn sym(s: &str) -> Symbol {
    s.parse().unwrap()
}

fn daily_series(start: NaiveDate, closes: &[f64]) -> Vec<HistoricalPrice> {
    closes
        .iter()
        .zip(start.iter_days())
        .map(|(&close, date)| HistoricalPrice {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
        })
        .collect()
}

fn provider() -> StaticMarketProvider {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let closes: Vec<f64> = (0..120).map(|i| 100.0 + f64::from(i)).collect();
    StaticMarketProvider::new()
        .with_quote(StaticMarketProvider::sample_quote("AAPL", 180.0, 160.0, 200.0, 18.0))
        .with_quote(StaticMarketProvider::sample_quote("MSFT", 400.0, 300.0, 420.0, 35.0))
        .with_history("AAPL", daily_series(start, &closes))
        .with_history("TINY", daily_series(start, &[10.0, 11.0]))
        .with_metrics(
            "AAPL",
            FundamentalMetrics {
                roe: 0.2,
                debt_to_equity: 0.8,
                current_ratio: 1.5,
                ..FundamentalMetrics::default()
            },
        )
}

fn service_with(
    provider: Arc<StaticMarketProvider>,
    insight: Option<Arc<dyn InsightProvider>>,
) -> (Arc<DashboardService>, Arc<FakeClockProvider>) {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();
    let clock = Arc::new(FakeClockProvider::new(
        Utc.with_ymd_and_hms(2024, 6, 3, 14, 30, 0).unwrap(),
    ));
    let cache = Arc::new(MemCache::with_clock(clock.clone()));
    let service = DashboardService::new(provider, cache, insight, DashboardOptions::default());
    (service, clock)
}

#[tokio::test]
async fn test_quote_is_cached_for_fifteen_minutes() {
    let provider = Arc::new(provider());
    let (service, clock) = service_with(provider.clone(), None);

    let first = service.quote(&sym("aapl")).await.unwrap();
    assert_eq!(first.symbol, "AAPL");
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 1);

    clock.advance(TimeDelta::minutes(14));
    let second = service.quote(&sym("AAPL")).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 1);

    clock.advance(TimeDelta::minutes(1));
    service.quote(&sym("AAPL")).await.unwrap();
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_quote_cache_is_per_symbol() {
    let provider = Arc::new(provider());
    let (service, _clock) = service_with(provider.clone(), None);

    service.quote(&sym("AAPL")).await.unwrap();
    let msft = service.quote(&sym("MSFT")).await.unwrap();
    assert_eq!(msft.current_price, 400.0);
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_quote_not_found_propagates() {
    let (service, _clock) = service_with(Arc::new(provider()), None);
    let err = service.quote(&sym("ZZZZ")).await.unwrap_err();
    assert!(matches!(err, ManagerError::Market(MarketError::NotFound(_))), "{:?}", err);
}

#[tokio::test]
async fn test_broken_cache_does_not_fail_requests() {
    let provider = Arc::new(provider());
    let service = DashboardService::new(
        provider.clone(),
        Arc::new(BrokenCache),
        None,
        DashboardOptions::default(),
    );

    service.quote(&sym("AAPL")).await.unwrap();
    service.quote(&sym("AAPL")).await.unwrap();
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_blank_search_skips_provider() {
    let provider = Arc::new(provider());
    let (service, _clock) = service_with(provider.clone(), None);

    assert!(service.search("   ").await.unwrap().is_empty());
    assert_eq!(provider.search_calls.load(Ordering::SeqCst), 0);

    let results = service.search(" msft ").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].symbol, "MSFT");
    assert_eq!(provider.search_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_forecast_report_shape() {
    let (service, _clock) = service_with(Arc::new(provider()), None);

    let report = service
        .forecast(&sym("AAPL"), ForecastMethod::Linear, ForecastOptions::default())
        .await
        .unwrap();

    assert_eq!(report.symbol.as_str(), "AAPL");
    assert_eq!(report.method, ForecastMethod::Linear);
    assert_eq!(report.historical.len(), 90);
    assert_eq!(report.historical.last().unwrap().close, 219.0);
    assert_eq!(report.forecast.len(), 30);

    // 完美直线：第一步紧接最后一个收盘价
    let first = &report.forecast[0];
    assert!((first.predicted_price - 220.0).abs() < 1e-6);
    assert_eq!(
        first.date,
        report.historical.last().unwrap().date.succ_opt().unwrap()
    );
}

#[tokio::test]
async fn test_forecast_precondition_failure() {
    let (service, _clock) = service_with(Arc::new(provider()), None);

    let err = service
        .forecast(&sym("TINY"), ForecastMethod::Linear, ForecastOptions::default())
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            ManagerError::Forecast(ForecastError::InsufficientData { provided: 2, .. })
        ),
        "{:?}",
        err
    );

    // 均线法对短序列可用
    let report = service
        .forecast(
            &sym("TINY"),
            ForecastMethod::Sma,
            ForecastOptions {
                window: 30,
                horizon: 5,
            },
        )
        .await
        .unwrap();
    assert_eq!(report.forecast.len(), 5);
    assert_eq!(report.historical.len(), 2);
}

#[tokio::test]
async fn test_analyze_with_metrics() {
    let provider = Arc::new(provider());
    let (service, _clock) = service_with(provider.clone(), None);

    let report = service.analyze(&sym("AAPL")).await.unwrap();
    // pe 18 -> 70；roe 80 / 负债 60 / 流动性 60 -> 67；(180-160)/40 -> 50
    assert_eq!(
        report.scores,
        ScoreSet {
            value: 70,
            health: 67,
            momentum: 50,
            overall: 63,
        }
    );
    assert!(report.metrics.is_some());
    assert_eq!(report.quote.current_price, 180.0);
    assert_eq!(provider.metrics_calls.load(Ordering::SeqCst), 1);

    // 报价走缓存
    service.analyze(&sym("AAPL")).await.unwrap();
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_analyze_degrades_when_metrics_fail() {
    let provider = Arc::new(provider().failing_metrics());
    let (service, _clock) = service_with(provider, None);

    let report = service.analyze(&sym("AAPL")).await.unwrap();
    assert!(report.metrics.is_none());
    assert_eq!(report.scores.health, 50);
}

#[tokio::test]
async fn test_analyze_fails_without_quote() {
    let (service, _clock) = service_with(Arc::new(provider()), None);
    let err = service.analyze(&sym("ZZZZ")).await.unwrap_err();
    assert!(matches!(err, ManagerError::Market(MarketError::NotFound(_))));
}

#[tokio::test]
async fn test_explain_without_provider_is_not_configured() {
    let (service, _clock) = service_with(Arc::new(provider()), None);
    assert!(!service.insight_enabled());

    let scores = ScoreSet {
        value: 70,
        health: 60,
        momentum: 40,
        overall: 58,
    };
    let err = service.explain(&sym("AAPL"), &scores).await.unwrap_err();
    assert!(matches!(err, ManagerError::Insight(InsightError::NotConfigured)));
    assert_eq!(err.to_string(), "Insight error: OpenAI API key is not configured");
}

#[tokio::test]
async fn test_explain_forwards_scores() {
    let canned = Arc::new(CannedInsightProvider::ok(Insight {
        headline: "Steady".to_string(),
        summary: "Balanced scores.".to_string(),
        next_step: "Compare peers.".to_string(),
    }));
    let (service, _clock) = service_with(Arc::new(provider()), Some(canned.clone() as Arc<dyn InsightProvider>));

    let scores = ScoreSet {
        value: 70,
        health: 60,
        momentum: 40,
        overall: 58,
    };
    let insight = service.explain(&sym("aapl"), &scores).await.unwrap();
    assert_eq!(insight.headline, "Steady");
    assert_eq!(*canned.last_scores.get("AAPL").unwrap(), scores);
}

#[tokio::test]
async fn test_explain_upstream_failure() {
    let canned: Arc<dyn InsightProvider> = Arc::new(CannedInsightProvider::failing(503));
    let (service, _clock) = service_with(Arc::new(provider()), Some(canned));

    let scores = ScoreSet {
        value: 50,
        health: 50,
        momentum: 50,
        overall: 50,
    };
    let err = service.explain(&sym("AAPL"), &scores).await.unwrap_err();
    assert!(matches!(
        err,
        ManagerError::Insight(InsightError::Upstream { status: 503, .. })
    ));
}

#[test]
fn test_options_from_config() {
    let config = stockscope_core::config::CacheConfig { quote_ttl_secs: 60 };
    let options = DashboardOptions::from_config(&config);
    assert_eq!(options.quote_ttl, TimeDelta::minutes(1));
    assert_eq!(options.history_days, 365);
    assert_eq!(options.historical_tail, 90);
    assert_eq!(options.search_limit, 10);
}
