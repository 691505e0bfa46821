use stockscope_core::analysis::entity::{QuoteSnapshot, ScoreSet};
use stockscope_core::market::entity::FundamentalMetrics;

/// 数据缺失时的中性分
pub const NEUTRAL_SCORE: i32 = 50;

pub const VALUE_WEIGHT: f64 = 0.35;
pub const HEALTH_WEIGHT: f64 = 0.35;
pub const MOMENTUM_WEIGHT: f64 = 0.30;

const SCORE_MIN: i32 = 0;
const SCORE_MAX: i32 = 100;

/// # Summary
/// 截断前的原始分数。
///
/// # Invariants
/// - `momentum` 与 `overall` 可能越出 `[0, 100]`，仅在 `clamped` 时统一收敛。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawScores {
    pub value: i32,
    pub health: i32,
    pub momentum: i32,
    pub overall: i32,
}

impl RawScores {
    /// 将每一项独立截断到 `[0, 100]`
    pub fn clamped(&self) -> ScoreSet {
        ScoreSet {
            value: clamp_score(self.value),
            health: clamp_score(self.health),
            momentum: clamp_score(self.momentum),
            overall: clamp_score(self.overall),
        }
    }
}

/// # Summary
/// 将报价快照与可选的基本面指标映射为有界评分。
///
/// # Logic
/// 1. 计算估值、健康度、动量三项原始分与加权总分。
/// 2. 所有分项与总分分别截断到 `[0, 100]`。
///
/// 该函数永不失败：缺失或无意义的输入退化为中性默认值，保证结果总是可展示。
pub fn score(quote: &QuoteSnapshot, metrics: Option<&FundamentalMetrics>) -> ScoreSet {
    raw_scores(quote, metrics).clamped()
}

/// 计算截断前的各项分数
pub fn raw_scores(quote: &QuoteSnapshot, metrics: Option<&FundamentalMetrics>) -> RawScores {
    let value = value_score(quote.pe_ratio);
    let health = health_score(metrics);
    let momentum = momentum_score(
        quote.current_price,
        quote.fifty_two_week_low,
        quote.fifty_two_week_high,
    );

    RawScores {
        value,
        health,
        momentum,
        overall: blend(value, health, momentum),
    }
}

/// # Summary
/// 估值分，基于市盈率分档。
///
/// # Logic
/// 市盈率非正 (亏损或缺失) 视为"不可用"，给中性分而非惩罚。
pub fn value_score(pe_ratio: f64) -> i32 {
    if pe_ratio.is_nan() || pe_ratio <= 0.0 {
        return NEUTRAL_SCORE;
    }
    if pe_ratio < 15.0 {
        85
    } else if pe_ratio < 20.0 {
        70
    } else if pe_ratio < 30.0 {
        55
    } else if pe_ratio < 50.0 {
        35
    } else {
        20
    }
}

/// # Summary
/// 健康度分，三个分档子项的四舍五入均值。
///
/// # Logic
/// 1. ROE: `>0.15 → 80`，`>0.10 → 60`，否则 40。
/// 2. 负债权益比: `<0.5 → 80`，`<1.0 → 60`，否则 30。
/// 3. 流动比率: `>2 → 80`，`>1 → 60`，否则 30。
/// 4. 无指标时给中性分。
pub fn health_score(metrics: Option<&FundamentalMetrics>) -> i32 {
    let Some(m) = metrics else {
        return NEUTRAL_SCORE;
    };

    let roe = if m.roe > 0.15 {
        80.0
    } else if m.roe > 0.10 {
        60.0
    } else {
        40.0
    };
    let debt = if m.debt_to_equity < 0.5 {
        80.0
    } else if m.debt_to_equity < 1.0 {
        60.0
    } else {
        30.0
    };
    let liquidity = if m.current_ratio > 2.0 {
        80.0
    } else if m.current_ratio > 1.0 {
        60.0
    } else {
        30.0
    };

    round_half_up((roe + debt + liquidity) / 3.0)
}

/// # Summary
/// 动量分，当前价在 52 周区间中的线性位置。
///
/// # Logic
/// 1. 区间宽度为正时直接作分母 (含小于 1 的窄区间，价格位于高点仍得 100)；
///    宽度为零、为负 (高低点倒挂) 或无效时以 1 代替。
/// 2. 结果不在此处截断，价格越出区间时分数可低于 0 或高于 100。
pub fn momentum_score(current_price: f64, low: f64, high: f64) -> i32 {
    let range = high - low;
    let range = if range > 0.0 { range } else { 1.0 };
    round_half_up((current_price - low) / range * 100.0)
}

/// 总分加权：`0.35 * 估值 + 0.35 * 健康度 + 0.30 * 动量`，未截断
pub fn blend(value: i32, health: i32, momentum: i32) -> i32 {
    round_half_up(
        f64::from(value) * VALUE_WEIGHT
            + f64::from(health) * HEALTH_WEIGHT
            + f64::from(momentum) * MOMENTUM_WEIGHT,
    )
}

fn clamp_score(raw: i32) -> u8 {
    u8::try_from(raw.clamp(SCORE_MIN, SCORE_MAX)).unwrap_or(u8::MAX)
}

/// 四舍五入，`.5` 一律向正无穷进位；非有限值按 0 处理，越界值饱和到 i32 边界
#[allow(clippy::cast_possible_truncation)]
fn round_half_up(x: f64) -> i32 {
    if !x.is_finite() {
        return 0;
    }
    let floor = x.floor();
    let rounded = if x - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i32
}
