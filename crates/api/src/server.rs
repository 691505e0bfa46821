//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use stockscope_manager::dashboard::DashboardService;

use crate::routes::{analysis, forecast, health, insight, stocks};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - `dashboard` 在服务启动前由 DI 容器注入，生命周期与进程等同。
#[derive(Clone)]
pub struct AppState {
    /// 看板应用服务 (Facade)
    pub dashboard: Arc<DashboardService>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockscope 股票研究看板 API",
        version = "0.1.0",
        description = "面向个人投资学习者的股票研究接口：报价、搜索、价格预测、评分与大模型解读。",
        license(name = "MIT")
    ),
    tags(
        (name = "行情 (Stocks)", description = "报价快照与证券搜索"),
        (name = "分析 (Analysis)", description = "价格预测与多维评分"),
        (name = "解读 (Insight)", description = "基于评分的大模型教育性解读"),
        (name = "系统 (System)", description = "存活探针")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// 构建完整的 axum 应用路由树 (含 Swagger UI 与 CORS)。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
pub fn build_router(state: AppState) -> Router {
    // 1. 注册所有路由并自动收集 OpenAPI Doc
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(stocks::search_stocks))
        .routes(routes!(stocks::get_quote))
        .routes(routes!(forecast::create_forecast))
        .routes(routes!(analysis::get_analysis))
        .routes(routes!(insight::explain_scores))
        .routes(routes!(health::health))
        .with_state(state)
        .split_for_parts();

    // 2. 配置 CORS (浏览器看板可能与 API 不同源)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 3. 合并 Swagger UI 路由并应用中间件
    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
}

/// 在已绑定的监听器上提供服务，供集成测试使用随机端口。
pub async fn serve(state: AppState, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

/// 绑定地址并启动 HTTP 监听。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:8080"`
///
/// # Returns
/// TCP 绑定失败或服务异常退出时返回错误。
pub async fn start_server(state: AppState, bind_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(bind_addr).await?;

    tracing::info!("🚀 Stockscope API Server listening on {}", bind_addr);
    tracing::info!("📖 Swagger UI: http://{}/swagger-ui/", bind_addr);

    serve(state, listener).await
}
