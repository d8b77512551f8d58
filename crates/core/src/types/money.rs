//! Aggregate monetary amounts.
//!
//! Totals and averages are not bounded like a [`Price`](super::Price), but
//! they always carry exactly two decimal places, including zero.

use core::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::price::Price;

/// A monetary amount held at two decimal places.
///
/// ```
/// use rust_decimal::Decimal;
/// use stockroom_core::Money;
///
/// assert_eq!(Money::from(Decimal::ZERO).to_string(), "0.00");
/// assert_eq!(Money::from(Decimal::new(5635, 1)).to_string(), "563.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Money {
    fn from(mut amount: Decimal) -> Self {
        amount.rescale(Price::SCALE);
        Self(amount)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::from(Decimal::ZERO)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Money {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

// PostgreSQL sends `0.00` with no fractional digits, so the scale is
// restored on decode.
#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Money {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::from(amount))
    }
}
