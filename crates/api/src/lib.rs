//! # `stockscope-api` - HTTP API 网关
//!
//! 本 crate 是 Stockscope 股票研究看板的 HTTP/REST 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收来自浏览器看板的 HTTP 请求并校验参数
//! - 调用下层 `DashboardService` 完成报价、搜索、预测、评分与解读
//! - 将领域模型转换为 DTO，并以统一的 `ApiResponse` 信封返回

pub mod types;
pub mod error;
pub mod routes;
pub mod server;
