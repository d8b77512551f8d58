//! Aggregate views computed by the database at query time.
//!
//! Monetary totals and averages decode as [`Money`], so they serialize as
//! two-decimal strings. Empty groups report `"0.00"`.

use serde::Serialize;

use stockroom_core::{CategoryId, Money, SupplierId};

/// Per-category item count, stock value and average price.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub item_count: i64,
    pub total_stock_value: Money,
    pub avg_price: Money,
}

/// Per-supplier item count and stock value.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SupplierSummary {
    pub id: SupplierId,
    pub name: String,
    pub item_count: i64,
    pub total_stock_value: Money,
}

/// Totals over every item.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockSummary {
    pub total_items: i64,
    pub total_stock: i64,
    pub total_value: Money,
    pub avg_price: Money,
}

/// Whole-system counts shown to authenticated accounts.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SystemSummary {
    pub total_items: i64,
    pub total_categories: i64,
    pub total_suppliers: i64,
    pub total_stock: i64,
    pub total_stock_value: Money,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_empty_supplier_serializes_two_place_zero() {
        let summary = SupplierSummary {
            id: SupplierId::new(4),
            name: "Idle Supply".to_string(),
            item_count: 0,
            total_stock_value: Money::from(Decimal::ZERO),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["item_count"], 0);
        assert_eq!(json["total_stock_value"], "0.00");
    }

    #[test]
    fn test_empty_category_serializes_two_place_zero() {
        let summary = CategorySummary {
            id: CategoryId::new(5),
            name: "Empty".to_string(),
            item_count: 0,
            total_stock_value: Money::default(),
            avg_price: Money::default(),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_stock_value"], "0.00");
        assert_eq!(json["avg_price"], "0.00");
    }
}
