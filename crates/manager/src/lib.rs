//! # `stockscope-manager` - 应用服务层
//!
//! 把行情端口、缓存端口、解读端口与纯计算核心串联为看板所需的用例。
//! 编译期只依赖 `stockscope-core` 的 Trait 定义，具体实现由 `app` 注入。

pub mod dashboard;
