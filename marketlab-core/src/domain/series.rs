//! SeriesPoint — one sample of a synthesized series.

use serde::{Deserialize, Serialize};

/// Ordinal sample within one range's sequence.
///
/// `index` is a position (hour of the day, day of the week/month), not a
/// wall-clock timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub index: usize,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(index: usize, value: f64) -> Self {
        Self { index, value }
    }
}

/// Builds a series from raw values, numbering them from zero.
pub fn points_from_values(values: &[f64]) -> Vec<SeriesPoint> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| SeriesPoint { index, value })
        .collect()
}
