//! Bar: the fundamental market data unit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted price. Rolling sums over long windows stay finite below it.
pub const MAX_PRICE: f64 = 1e15;

/// OHLCV bar for a single symbol on a single timeframe step.
///
/// The engine assigns the sequence index when it accepts the bar; the bar
/// itself carries prices only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// Why a bar was rejected before reaching any indicator state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("{field} is not finite")]
    NonFinite { field: &'static str },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} {value} exceeds the price limit {MAX_PRICE}")]
    TooLarge { field: &'static str, value: f64 },

    #[error("high {high} is below low {low}")]
    HighBelowLow { high: f64, low: f64 },

    #[error("open {open} outside [{low}, {high}]")]
    OpenOutOfRange { open: f64, low: f64, high: f64 },

    #[error("close {close} outside [{low}, {high}]")]
    CloseOutOfRange { close: f64, low: f64, high: f64 },

    #[error("volume must be non-negative, got {0}")]
    NegativeVolume(f64),
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// A bar with open = high = low = close.
    pub fn flat(price: f64, volume: f64) -> Self {
        Self::new(price, price, price, price, volume)
    }

    /// Typical price (high + low + close) / 3.
    pub fn hlc3(&self) -> f64 {
        self.high / 3.0 + self.low / 3.0 + self.close / 3.0
    }

    /// Average of all four prices.
    pub fn ohlc4(&self) -> f64 {
        self.open / 4.0 + self.high / 4.0 + self.low / 4.0 + self.close / 4.0
    }

    /// Midpoint of the bar range.
    pub fn hl2(&self) -> f64 {
        self.high / 2.0 + self.low / 2.0
    }

    /// Check the OHLCV sanity rules: finite positive prices up to `MAX_PRICE`,
    /// `low <= {open, close} <= high`, non-negative volume.
    pub fn validate(&self) -> Result<(), BarError> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (field, value) in prices {
            if !value.is_finite() {
                return Err(BarError::NonFinite { field });
            }
            if value <= 0.0 {
                return Err(BarError::NonPositive { field, value });
            }
            if value > MAX_PRICE {
                return Err(BarError::TooLarge { field, value });
            }
        }
        if !self.volume.is_finite() {
            return Err(BarError::NonFinite { field: "volume" });
        }
        if self.volume < 0.0 {
            return Err(BarError::NegativeVolume(self.volume));
        }
        if self.high < self.low {
            return Err(BarError::HighBelowLow {
                high: self.high,
                low: self.low,
            });
        }
        if self.open < self.low || self.open > self.high {
            return Err(BarError::OpenOutOfRange {
                open: self.open,
                low: self.low,
                high: self.high,
            });
        }
        if self.close < self.low || self.close > self.high {
            return Err(BarError::CloseOutOfRange {
                close: self.close,
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }

    pub fn is_sane(&self) -> bool {
        self.validate().is_ok()
    }
}
