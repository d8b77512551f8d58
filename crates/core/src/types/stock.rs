//! Stock quantities and reorder thresholds.

use serde::{Deserialize, Serialize};

/// Reorder threshold applied when an item is created without one.
pub const DEFAULT_THRESHOLD: i32 = 5;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StockError {
    #[error("stock quantity cannot be negative")]
    NegativeQuantity,
    #[error("threshold cannot be negative")]
    NegativeThreshold,
}

/// On-hand quantity of an item together with its reorder threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    quantity: i32,
    threshold: i32,
}

impl StockLevel {
    /// # Errors
    ///
    /// Returns an error if either value is negative.
    pub const fn new(quantity: i32, threshold: i32) -> Result<Self, StockError> {
        if quantity < 0 {
            return Err(StockError::NegativeQuantity);
        }
        if threshold < 0 {
            return Err(StockError::NegativeThreshold);
        }
        Ok(Self {
            quantity,
            threshold,
        })
    }

    #[must_use]
    pub const fn quantity(&self) -> i32 {
        self.quantity
    }

    #[must_use]
    pub const fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Whether the item belongs in the low-stock alert feed.
    ///
    /// Strictly less than: an item sitting exactly on its threshold is not
    /// flagged.
    #[must_use]
    pub const fn is_below_threshold(&self) -> bool {
        self.quantity < self.threshold
    }
}
