use chrono::{Days, NaiveDate};
use stockscope_core::analysis::entity::{ForecastMethod, ForecastOptions, ForecastPoint};
use stockscope_core::analysis::error::ForecastError;
use stockscope_core::market::entity::HistoricalPrice;

/// 95% 置信带对应的正态分位数
pub const CONFIDENCE_Z: f64 = 1.96;

/// 线性回归估计残差方差所需的最少样本数 (自由度 n-2 > 0)
pub const LINEAR_MIN_POINTS: usize = 3;

/// # Summary
/// 拟合得到的直线外推模型。
///
/// # Invariants
/// - 第 `i` 个预测步的自变量为 `x_offset + i`。
/// - `half_width` 在整个预测区间内固定不变。
#[derive(Debug, Clone, Copy, PartialEq)]
struct LineFit {
    slope: f64,
    intercept: f64,
    x_offset: usize,
    half_width: f64,
}

/// # Summary
/// 根据历史收盘价序列外推未来价格。
///
/// # Logic
/// 1. 校验 `horizon`、`window` 与序列非空。
/// 2. 复制序列并按日期升序排序，只读取收盘价。
/// 3. 按 `method` 拟合直线模型与置信带半宽。
/// 4. 从最后一个历史日期起逐自然日生成 `horizon` 个预测点 (不跳过周末与节假日)。
///
/// 置信带宽度为 `1.96 * σ` 且不随外推距离增大，这是有意保留的简化，
/// 并非严格的预测区间。
///
/// # Arguments
/// * `series`: 历史行情，顺序不限。
/// * `method`: 外推方法。
/// * `options`: 窗口 (仅均线法使用) 与预测步数。
///
/// # Returns
/// 成功返回恰好 `options.horizon` 个预测点；前置条件不满足时返回 `ForecastError`。
pub fn forecast(
    series: &[HistoricalPrice],
    method: ForecastMethod,
    options: ForecastOptions,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    if options.horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "horizon must be a positive number of days".to_string(),
        ));
    }
    if options.window == 0 {
        return Err(ForecastError::InvalidParameter(
            "window must be a positive number of points".to_string(),
        ));
    }

    let mut ordered: Vec<&HistoricalPrice> = series.iter().collect();
    ordered.sort_by_key(|p| p.date);
    let last_date = ordered.last().ok_or(ForecastError::EmptySeries)?.date;
    let closes: Vec<f64> = ordered.iter().map(|p| p.close).collect();

    let fit = match method {
        ForecastMethod::Sma => fit_moving_average(&closes, options.window)?,
        ForecastMethod::Linear => fit_linear_regression(&closes)?,
    };

    project(&fit, last_date, options.horizon)
}

/// # Summary
/// 移动均值 + 趋势漂移模型。
///
/// # Logic
/// 1. 取最后 `window` 个收盘价 (不足则取全部)。
/// 2. 基线为窗口均值，趋势为 (窗口末值 - 窗口首值) / 窗口长度。
/// 3. 置信半宽为窗口总体标准差 (除以 n) 乘以 1.96。
fn fit_moving_average(closes: &[f64], window: usize) -> Result<LineFit, ForecastError> {
    let start = closes.len().saturating_sub(window);
    let recent = &closes[start..];
    let (first, last) = match (recent.first(), recent.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(ForecastError::EmptySeries),
    };
    let len = count_to_f64(recent.len())?;

    let baseline = recent.iter().sum::<f64>() / len;
    let trend = (last - first) / len;
    let variance = recent.iter().map(|p| (p - baseline).powi(2)).sum::<f64>() / len;

    Ok(LineFit {
        slope: trend,
        intercept: baseline,
        x_offset: 0,
        half_width: variance.sqrt() * CONFIDENCE_Z,
    })
}

/// # Summary
/// 普通最小二乘线性回归模型。
///
/// # Logic
/// 1. 以序列下标 (从 0 开始) 为自变量，按闭式公式求斜率与截距。
/// 2. 标准误为 `sqrt(RSS / (n - 2))`，n 不足 3 时拒绝计算。
fn fit_linear_regression(closes: &[f64]) -> Result<LineFit, ForecastError> {
    let n = closes.len();
    if n == 0 {
        return Err(ForecastError::EmptySeries);
    }
    if n < LINEAR_MIN_POINTS {
        return Err(ForecastError::InsufficientData {
            method: ForecastMethod::Linear,
            required: LINEAR_MIN_POINTS,
            provided: n,
        });
    }

    let xs = (0..n).map(count_to_f64).collect::<Result<Vec<f64>, _>>()?;
    let nf = count_to_f64(n)?;

    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = closes.iter().sum();
    let sum_xy: f64 = xs.iter().zip(closes).map(|(x, y)| x * y).sum();
    let sum_x2: f64 = xs.iter().map(|x| x * x).sum();

    let slope = (nf * sum_xy - sum_x * sum_y) / (nf * sum_x2 - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / nf;

    let ss_residual: f64 = xs
        .iter()
        .zip(closes)
        .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
        .sum();
    let standard_error = (ss_residual / (nf - 2.0)).sqrt();

    Ok(LineFit {
        slope,
        intercept,
        x_offset: n - 1,
        half_width: standard_error * CONFIDENCE_Z,
    })
}

/// 按固定半宽生成逐日预测点，价格与下界截断到 0
fn project(
    fit: &LineFit,
    last_date: NaiveDate,
    horizon: usize,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    (1..=horizon)
        .map(|step| {
            let x = count_to_f64(fit.x_offset + step)?;
            let predicted_price = (fit.slope * x + fit.intercept).max(0.0);
            let date = u64::try_from(step)
                .ok()
                .and_then(|d| last_date.checked_add_days(Days::new(d)))
                .ok_or_else(|| {
                    ForecastError::DateOverflow(format!("{} + {} days", last_date, step))
                })?;

            Ok(ForecastPoint {
                date,
                predicted_price,
                confidence_lower: (predicted_price - fit.half_width).max(0.0),
                confidence_upper: predicted_price + fit.half_width,
            })
        })
        .collect()
}

/// 计数转浮点，超出 u32 范围的序列视为非法输入
fn count_to_f64(n: usize) -> Result<f64, ForecastError> {
    u32::try_from(n)
        .map(f64::from)
        .map_err(|_| ForecastError::InvalidParameter(format!("series too long: {}", n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average_fit_on_flat_series_has_zero_band() {
        let fit = fit_moving_average(&[5.0, 5.0, 5.0, 5.0], 30).unwrap();
        assert_eq!(fit.intercept, 5.0);
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.half_width, 0.0);
    }

    #[test]
    fn test_moving_average_uses_population_std_dev() {
        // 均值 2，离差平方和 2，总体方差 2/3
        let fit = fit_moving_average(&[1.0, 2.0, 3.0], 3).unwrap();
        let expected = (2.0_f64 / 3.0).sqrt() * CONFIDENCE_Z;
        assert!((fit.half_width - expected).abs() < 1e-12);
    }

    #[test]
    fn test_linear_fit_recovers_exact_line() {
        let fit = fit_linear_regression(&[1.0, 3.0, 5.0, 7.0]).unwrap();
        assert_eq!(fit.slope, 2.0);
        assert_eq!(fit.intercept, 1.0);
        assert_eq!(fit.x_offset, 3);
        assert_eq!(fit.half_width, 0.0);
    }

    #[test]
    fn test_linear_fit_rejects_two_points() {
        let err = fit_linear_regression(&[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientData {
                method: ForecastMethod::Linear,
                required: 3,
                provided: 2,
            }
        );
    }

    #[test]
    fn test_project_clamps_negative_prices() {
        let fit = LineFit {
            slope: -10.0,
            intercept: 15.0,
            x_offset: 0,
            half_width: 4.0,
        };
        let start = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let points = project(&fit, start, 3).unwrap();
        assert_eq!(points[0].predicted_price, 5.0);
        assert_eq!(points[0].confidence_lower, 1.0);
        assert_eq!(points[1].predicted_price, 0.0);
        assert_eq!(points[1].confidence_lower, 0.0);
        assert_eq!(points[1].confidence_upper, 4.0);
        // 闰年二月
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }
}
