use std::sync::Arc;
use std::time::Duration;

use stockscope_api::server::{AppState, start_server};
use stockscope_cache::mem::MemCache;
use stockscope_core::insight::port::InsightProvider;
use stockscope_feed::fmp::FmpProvider;
use stockscope_insight::openai::{OpenAiConfig, OpenAiInsightProvider};
use stockscope_manager::dashboard::{DashboardOptions, DashboardService};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod settings;

/// 过期缓存条目的清理周期
const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(300);

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 DashboardService。
///
/// # Logic
/// 1. 加载 `.env` 并初始化全局日志。
/// 2. 安装 TLS 加密后端并加载配置。
/// 3. 实例化基础设施层（Feed、Cache、Insight）。
/// 4. 构造应用服务层（DashboardService）。
/// 5. 启动 HTTP 服务，直到收到退出信号。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境变量与日志
    dotenvy::dotenv().ok();
    let (writer, _log_guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .init();
    info!("Stockscope starting...");

    // 2. TLS 与配置
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A rustls crypto provider was already installed");
    }
    let config = settings::load()?;
    if config.provider.api_key.is_empty() {
        warn!("FMP API key is not configured, market data requests will fail");
    }

    // 3. 实例化基础设施层
    let feed = Arc::new(FmpProvider::from_config(&config.provider)?);
    let cache = Arc::new(MemCache::new());
    let insight: Option<Arc<dyn InsightProvider>> = match OpenAiConfig::from_settings(&config.insight) {
        Some(openai) => {
            info!("AI insight enabled with model {}", openai.model);
            Some(Arc::new(OpenAiInsightProvider::new(openai)?))
        }
        None => {
            warn!("OpenAI API key is not configured, /api/ai/explain will be unavailable");
            None
        }
    };

    // 后台定期清理过期缓存
    let purge_cache = cache.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(CACHE_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = purge_cache.purge_expired();
            if purged > 0 {
                tracing::debug!("Purged {} expired cache entries", purged);
            }
        }
    });

    // 4. 构造应用服务层（注入 Core Trait 抽象）
    let dashboard = DashboardService::new(
        feed,
        cache,
        insight,
        DashboardOptions::from_config(&config.cache),
    );

    // 5. 启动服务，等待外部退出信号
    let bind_addr = config.server.bind_addr();
    tokio::select! {
        result = start_server(AppState { dashboard }, &bind_addr) => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown signal received. Exiting...");
        }
    }

    Ok(())
}
