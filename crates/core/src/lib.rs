//! # `stockscope-core` - 领域核心
//!
//! 定义股票研究看板的领域实体、错误类型与端口 (Port) 契约。
//! 本 crate 不包含任何 I/O 实现，具体适配器位于 `feed` / `cache` / `insight` 等 crate。

pub mod analysis;
pub mod cache;
pub mod common;
pub mod config;
pub mod insight;
pub mod market;

#[cfg(feature = "test-utils")]
pub mod testing;
