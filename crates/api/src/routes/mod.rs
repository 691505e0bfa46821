//! # 路由控制器
//!
//! 每个子模块对应看板的一组 REST 接口。

pub mod analysis;
pub mod forecast;
pub mod health;
pub mod insight;
pub mod stocks;

use stockscope_core::common::Symbol;

use crate::error::ApiError;

/// 校验并规范化路径或查询参数中的证券代码
pub(crate) fn parse_symbol(raw: &str) -> Result<Symbol, ApiError> {
    raw.parse::<Symbol>().map_err(ApiError::BadRequest)
}
