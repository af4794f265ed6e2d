//! SeriesSynthesizer — bounded oscillation plus uniform noise around a base price.
//!
//! Point `i` is `base * (1 + (sin(i / 3) + p) / 50)` with `p` uniform in
//! `[-0.1, 0.1]`, rounded to cents. Points are independent of each other: the
//! only state is the random source, so the walk can neither drift to zero nor
//! run away. Deviation from base stays within roughly ±2.2%.

use rand::Rng;

use crate::domain::{RangeKind, SeriesPoint};
use crate::error::{ensure_positive_price, MarketError};
use crate::metrics::round_to;

/// Half-width of the uniform perturbation term.
pub const PERTURBATION_BOUND: f64 = 0.1;

/// Divisor applied to `oscillation + perturbation`.
pub const DAMPING: f64 = 50.0;

/// Smallest base price whose lowest possible point still rounds to a cent.
pub const MIN_BASE_PRICE: f64 = 0.01 / (1.0 - (1.0 + PERTURBATION_BOUND) / DAMPING);

/// A base price must be finite, positive and at least `MIN_BASE_PRICE`, or
/// points could round to zero.
pub fn validate_base_price(base: f64, what: &str) -> Result<(), MarketError> {
    ensure_positive_price(base, what)?;
    if base < MIN_BASE_PRICE {
        return Err(MarketError::invalid(format!(
            "{what} {base} is below the minimum of {MIN_BASE_PRICE:.4}; points would round to zero"
        )));
    }
    Ok(())
}

/// Anything that can produce a series for a base price.
///
/// The factory only talks to this trait, so tests can substitute a fixed
/// series for the random one.
pub trait SeriesSource {
    fn generate(&mut self, base: f64, point_count: usize) -> Result<Vec<SeriesPoint>, MarketError>;

    fn generate_range(
        &mut self,
        base: f64,
        range: RangeKind,
    ) -> Result<Vec<SeriesPoint>, MarketError> {
        self.generate(base, range.point_count())
    }
}

/// Smooth component of point `index`, in [-1, 1].
pub fn oscillation(index: usize) -> f64 {
    (index as f64 / 3.0).sin()
}

/// Value of one point given its perturbation draw.
pub fn point_value(base: f64, index: usize, perturbation: f64) -> f64 {
    round_to(base * (1.0 + (oscillation(index) + perturbation) / DAMPING), 2)
}

/// The random-walk synthesizer, generic over an injected random source.
#[derive(Debug, Clone)]
pub struct SeriesSynthesizer<R> {
    rng: R,
}

impl<R: Rng> SeriesSynthesizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn perturbation(&mut self) -> f64 {
        self.rng.gen_range(-PERTURBATION_BOUND..=PERTURBATION_BOUND)
    }
}

impl<R: Rng> SeriesSource for SeriesSynthesizer<R> {
    fn generate(&mut self, base: f64, point_count: usize) -> Result<Vec<SeriesPoint>, MarketError> {
        validate_base_price(base, "base price")?;
        Ok((0..point_count)
            .map(|i| {
                let p = self.perturbation();
                SeriesPoint::new(i, point_value(base, i, p))
            })
            .collect())
    }
}
