//! Error taxonomy for the market-data core.
//!
//! The core performs no I/O, so there is no retryable class: a request is
//! either malformed (`InvalidInput`) or asks for something that is not in the
//! snapshot (`NotFound`).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketError {
    /// Non-positive base price, unrecognized enum spelling, bad limit, etc.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("instrument not found: {symbol}")]
    NotFound { symbol: String },
}

impl MarketError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(symbol: impl Into<String>) -> Self {
        Self::NotFound { symbol: symbol.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Rejects anything that is not a finite, strictly positive price.
pub(crate) fn ensure_positive_price(value: f64, what: &str) -> Result<(), MarketError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MarketError::invalid(format!("{what} must be a positive price, got {value}")))
    }
}
