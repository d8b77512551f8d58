//! Unit price of an inventory item.
//!
//! Prices are stored as `NUMERIC(10, 2)`: never negative, at most two
//! decimal places and at most eight digits before the point.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when validating a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("price cannot be negative")]
    Negative,
    #[error("price must have at most 2 decimal places")]
    TooManyDecimalPlaces,
    #[error("price must have at most 10 digits in total")]
    TooLarge,
}

/// A non-negative, two-decimal-place unit price.
///
/// ```
/// use rust_decimal::Decimal;
/// use stockroom_core::Price;
///
/// let price = Price::try_from(Decimal::new(99999, 2)).unwrap();
/// assert_eq!(price.stock_value(10), Decimal::new(999990, 2));
/// assert_eq!(price.to_string(), "999.99");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Number of decimal places every price carries.
    pub const SCALE: u32 = 2;

    /// Largest representable price in `NUMERIC(10, 2)`.
    pub const MAX: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

    /// Zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Validate a decimal amount and rescale it to two places.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative, has more than two
    /// significant decimal places, or exceeds [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount.normalize().scale() > Self::SCALE {
            return Err(PriceError::TooManyDecimalPlaces);
        }
        if amount > Self::MAX {
            return Err(PriceError::TooLarge);
        }

        let mut amount = amount.abs();
        amount.rescale(Self::SCALE);
        Ok(Self(amount))
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Value of `quantity` units at this price, always at two places.
    #[must_use]
    pub fn stock_value(&self, quantity: i32) -> Decimal {
        let mut value = self.0 * Decimal::from(quantity);
        value.rescale(Self::SCALE);
        value
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
