use crate::analysis::entity::ForecastMethod;
use thiserror::Error;

/// # Summary
/// 预测引擎错误枚举，均为前置条件违例而非运行期故障。
///
/// # Invariants
/// - 评分引擎永不失败，因此没有对应的错误类型。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    // 空序列，没有可锚定的最后价格
    #[error("Price series is empty")]
    EmptySeries,
    // 序列长度不足以估计该方法的参数
    #[error("{method} forecast needs at least {required} points, got {provided}")]
    InsufficientData {
        method: ForecastMethod,
        required: usize,
        provided: usize,
    },
    // 窗口或步数不合法
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    // 预测日期超出可表示范围
    #[error("Forecast date out of range: {0}")]
    DateOverflow(String),
}
