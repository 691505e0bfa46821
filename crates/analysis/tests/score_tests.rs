use stockscope_analysis::score;
use stockscope_analysis::score::{
    NEUTRAL_SCORE, blend, health_score, momentum_score, raw_scores, value_score,
};
use stockscope_core::analysis::entity::{QuoteSnapshot, ScoreSet};
use stockscope_core::market::entity::FundamentalMetrics;

fn quote(pe: f64, price: f64, low: f64, high: f64) -> QuoteSnapshot {
    QuoteSnapshot {
        pe_ratio: pe,
        price_change_percent: 1.2,
        dividend_yield: 0.4,
        current_price: price,
        fifty_two_week_high: high,
        fifty_two_week_low: low,
    }
}

fn metrics(roe: f64, debt_to_equity: f64, current_ratio: f64) -> FundamentalMetrics {
    FundamentalMetrics {
        roe,
        debt_to_equity,
        current_ratio,
        ..Default::default()
    }
}

fn in_bounds(s: &ScoreSet) -> bool {
    [s.value, s.health, s.momentum, s.overall].iter().all(|v| *v <= 100)
}

#[test]
fn test_value_bands() {
    assert_eq!(value_score(12.0), 85);
    assert_eq!(value_score(15.0), 70);
    assert_eq!(value_score(19.99), 70);
    assert_eq!(value_score(25.0), 55);
    assert_eq!(value_score(45.0), 35);
    assert_eq!(value_score(50.0), 20);
    assert_eq!(value_score(300.0), 20);
}

#[test]
fn test_non_positive_pe_is_neutral() {
    assert_eq!(value_score(0.0), 50);
    assert_eq!(value_score(-12.0), 50);
    assert_eq!(value_score(f64::NAN), NEUTRAL_SCORE);

    let s = score(&quote(12.0, 50.0, 0.0, 100.0), None);
    assert_eq!(s.value, 85);
    let s = score(&quote(0.0, 50.0, 0.0, 100.0), None);
    assert_eq!(s.value, 50);
}

#[test]
fn test_missing_metrics_gives_neutral_health() {
    let s = score(&quote(18.0, 120.0, 100.0, 150.0), None);
    assert_eq!(s.health, 50);
}

#[test]
fn test_health_averages_three_bands() {
    // 80 + 80 + 80
    assert_eq!(health_score(Some(&metrics(0.20, 0.3, 2.5))), 80);
    // 60 + 60 + 60
    assert_eq!(health_score(Some(&metrics(0.12, 0.7, 1.5))), 60);
    // 40 + 30 + 30 = 100 / 3 = 33.3
    assert_eq!(health_score(Some(&metrics(0.05, 2.0, 0.8))), 33);
    // 80 + 60 + 30 = 170 / 3 = 56.7
    assert_eq!(health_score(Some(&metrics(0.16, 0.9, 1.0))), 57);
    // 边界值不进入更高档
    assert_eq!(health_score(Some(&metrics(0.15, 0.5, 2.0))), 60);
}

#[test]
fn test_momentum_at_range_edges() {
    let s = score(&quote(20.0, 100.0, 100.0, 200.0), None);
    assert_eq!(s.momentum, 0);
    let s = score(&quote(20.0, 200.0, 100.0, 200.0), None);
    assert_eq!(s.momentum, 100);
    let s = score(&quote(20.0, 150.0, 100.0, 200.0), None);
    assert_eq!(s.momentum, 50);
}

#[test]
fn test_momentum_outside_range_is_clamped_only_at_the_end() {
    // 高于 52 周高点：原始动量 150，最终截断为 100
    let q = quote(20.0, 250.0, 100.0, 200.0);
    let raw = raw_scores(&q, None);
    assert_eq!(raw.momentum, 150);
    assert_eq!(raw.value, 55);
    assert_eq!(raw.overall, blend(55, 50, 150));
    let s = score(&q, None);
    assert_eq!(s.momentum, 100);
    // 19.25 + 17.5 + 45 = 81.75
    assert_eq!(s.overall, 82);

    // 低于 52 周低点
    let s = score(&quote(20.0, 50.0, 100.0, 200.0), None);
    assert_eq!(s.momentum, 0);
}

#[test]
fn test_narrow_range_uses_actual_width() {
    // 宽度 0.5 的窄区间按实际宽度计算，而非抬升到 1
    assert_eq!(momentum_score(10.5, 10.0, 10.5), 100);
    assert_eq!(momentum_score(10.25, 10.0, 10.5), 50);
    assert_eq!(momentum_score(10.0, 10.0, 10.5), 0);

    let s = score(&quote(20.0, 10.5, 10.0, 10.5), None);
    assert_eq!(s.momentum, 100);
}

#[test]
fn test_degenerate_range_does_not_divide_by_zero() {
    // 高低点相同：区间宽度按 1 处理
    assert_eq!(momentum_score(10.0, 10.0, 10.0), 0);
    assert_eq!(momentum_score(10.5, 10.0, 10.0), 50);
    // 高低点颠倒同样按 1 处理
    assert_eq!(momentum_score(10.0, 12.0, 8.0), -200);

    let s = score(&quote(20.0, 10.0, 12.0, 8.0), None);
    assert!(in_bounds(&s));
    assert_eq!(s.momentum, 0);
}

#[test]
fn test_weighted_sum_law_pre_clamp() {
    for (v, h, m) in [(85, 80, 100), (20, 33, 0), (50, 50, 50), (35, 57, -40), (70, 60, 180)] {
        let expected = (0.35 * v as f64 + 0.35 * h as f64 + 0.30 * m as f64 + 0.5).floor() as i32;
        assert_eq!(blend(v, h, m), expected, "blend({v}, {h}, {m})");
    }
}

#[test]
fn test_overall_matches_weighted_blend() {
    // value 70 (pe 18), health 60, momentum 40
    let q = quote(18.0, 140.0, 100.0, 200.0);
    let m = metrics(0.12, 0.7, 1.5);
    let s = score(&q, Some(&m));
    assert_eq!(s.value, 70);
    assert_eq!(s.health, 60);
    assert_eq!(s.momentum, 40);
    // 24.5 + 21 + 12 = 57.5 -> 58
    assert_eq!(s.overall, 58);
}

#[test]
fn test_scores_always_in_bounds() {
    let quotes = [
        quote(-5.0, -10.0, 0.0, 0.0),
        quote(f64::NAN, f64::NAN, f64::NAN, f64::NAN),
        quote(1.0, 1.0e12, 0.0, 1.0),
        quote(1000.0, -1.0e12, 0.0, 1.0),
        quote(8.0, 55.0, 50.0, 60.0),
    ];
    let all_metrics = [
        None,
        Some(metrics(0.3, 0.1, 3.0)),
        Some(metrics(-1.0, 10.0, 0.1)),
        Some(metrics(f64::NAN, f64::NAN, f64::NAN)),
    ];
    for q in &quotes {
        for m in &all_metrics {
            let s = score(q, m.as_ref());
            assert!(in_bounds(&s), "{:?} / {:?} -> {:?}", q, m, s);
        }
    }
}

#[test]
fn test_score_is_deterministic() {
    let q = quote(22.0, 173.4, 150.2, 199.9);
    let m = metrics(0.18, 1.2, 1.1);
    assert_eq!(score(&q, Some(&m)), score(&q, Some(&m)));
    assert_eq!(raw_scores(&q, None), raw_scores(&q, None));
}
