//! # `stockscope-analysis` - 计算核心
//!
//! 两个互相独立、无状态的纯函数组件：
//! - [`forecast`]：根据历史收盘价外推未来价格路径，附带对称置信带。
//! - [`score`]：将报价快照与基本面指标映射为有界评分。
//!
//! 两者不做 I/O、不打日志、不持有跨调用状态，可在任意并发请求中重复调用。

pub mod forecast;
pub mod score;

pub use forecast::forecast;
pub use score::score;
