//! Derived metrics — pure functions over a series of values.
//!
//! Every metric is a pure function: values in, scalar out. Rounding happens
//! here so the factory and the exchange-rate builder agree on it.

use crate::domain::{InstrumentStats, SeriesPoint};

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `(last - first) / first * 100`, rounded to 2 decimals.
///
/// Returns 0.0 when `first` is not positive.
pub fn change_percent(first: f64, last: f64) -> f64 {
    if first <= 0.0 {
        return 0.0;
    }
    round_to((last - first) / first * 100.0, 2)
}

/// Point-to-point percent returns.
pub fn percent_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| {
            if w[0] > 0.0 {
                (w[1] - w[0]) / w[0] * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Sample std-dev of percent returns, rounded to 2 decimals.
pub fn volatility(values: &[f64]) -> f64 {
    round_to(std_dev(&percent_returns(values)), 2)
}

/// Open, high, low and volatility of a series. Empty input yields zeros.
pub fn series_stats(points: &[SeriesPoint]) -> InstrumentStats {
    let Some(first) = points.first() else {
        return InstrumentStats::default();
    };
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let high = values.iter().copied().fold(f64::MIN, f64::max);
    let low = values.iter().copied().fold(f64::MAX, f64::min);
    InstrumentStats {
        open: first.value,
        day_high: round_to(high, 2),
        day_low: round_to(low, 2),
        volatility: volatility(&values),
    }
}
