//! Item domain types and write payloads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{
    AccountId, CategoryId, DEFAULT_THRESHOLD, ItemId, Price, PriceError, StockLevel, SupplierId,
};

use super::validation::{
    Field, FieldErrors, nullable, optional_text, required, required_text, stored, stored_opt,
    with_default,
};

pub const NAME_MAX_LEN: usize = 100;

const NON_NEGATIVE: &str = "Ensure this value is greater than or equal to 0.";

/// An inventory item as returned to clients.
///
/// `category_name`, `supplier_name` and `created_by` are joined in at query
/// time; `stock_value` is derived from price and quantity on every read.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub category: CategoryId,
    pub category_name: String,
    pub supplier: SupplierId,
    pub supplier_name: String,
    pub price: Price,
    pub stock_quantity: i32,
    pub threshold: i32,
    pub stock_value: Decimal,
    /// Username of the creating account.
    pub created_by: String,
    #[serde(skip)]
    pub created_by_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated item fields, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInput {
    pub name: String,
    pub description: Option<String>,
    pub category: CategoryId,
    pub supplier: SupplierId,
    pub price: Price,
    pub stock: StockLevel,
}

/// Request body for create, full update and partial update.
///
/// `price` accepts a JSON string or number. On create, omitted
/// `stock_quantity` and `threshold` fall back to 0 and 5.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPayload {
    #[serde(default, deserialize_with = "nullable")]
    pub name: Field<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Field<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Field<CategoryId>,
    #[serde(default, deserialize_with = "nullable")]
    pub supplier: Field<SupplierId>,
    #[serde(default, deserialize_with = "nullable")]
    pub price: Field<Decimal>,
    #[serde(default, deserialize_with = "nullable")]
    pub stock_quantity: Field<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub threshold: Field<i32>,
}

impl ItemPayload {
    /// Fill every field the payload leaves out from the stored item.
    #[must_use]
    pub fn over(self, existing: &Item) -> Self {
        let filled = self.over_optional(existing);
        Self {
            name: filled.name.or_else(|| stored(existing.name.clone())),
            category: filled.category.or(stored(existing.category)),
            supplier: filled.supplier.or(stored(existing.supplier)),
            price: filled.price.or(stored(existing.price.amount())),
            ..filled
        }
    }

    /// Fill `description`, `stock_quantity` and `threshold` from the stored
    /// item when omitted. Required fields stay as sent.
    #[must_use]
    pub fn over_optional(self, existing: &Item) -> Self {
        Self {
            description: self
                .description
                .or_else(|| stored_opt(existing.description.clone())),
            stock_quantity: self.stock_quantity.or(stored(existing.stock_quantity)),
            threshold: self.threshold.or(stored(existing.threshold)),
            ..self
        }
    }

    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(self) -> Result<ItemInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required_text(&mut errors, "name", self.name, NAME_MAX_LEN);
        let description = optional_text(&mut errors, "description", self.description, None);
        let category = required(&mut errors, "category", self.category);
        let supplier = required(&mut errors, "supplier", self.supplier);

        let price = required(&mut errors, "price", self.price).and_then(|amount| {
            Price::new(amount)
                .map_err(|e| errors.add("price", price_message(&e)))
                .ok()
        });

        let quantity = with_default(&mut errors, "stock_quantity", self.stock_quantity, 0)
            .filter(|q| non_negative(&mut errors, "stock_quantity", *q));
        let threshold = with_default(&mut errors, "threshold", self.threshold, DEFAULT_THRESHOLD)
            .filter(|t| non_negative(&mut errors, "threshold", *t));
        let stock = quantity
            .zip(threshold)
            .and_then(|(q, t)| StockLevel::new(q, t).ok());

        match (name, category, supplier, price, stock) {
            (Some(name), Some(category), Some(supplier), Some(price), Some(stock)) => {
                errors.finish(ItemInput {
                    name,
                    description,
                    category,
                    supplier,
                    price,
                    stock,
                })
            }
            _ => Err(errors),
        }
    }
}

fn non_negative(errors: &mut FieldErrors, field: &str, value: i32) -> bool {
    if value < 0 {
        errors.add(field, NON_NEGATIVE);
        return false;
    }
    true
}

fn price_message(err: &PriceError) -> &'static str {
    match err {
        PriceError::Negative => NON_NEGATIVE,
        PriceError::TooManyDecimalPlaces => {
            "Ensure that there are no more than 2 decimal places."
        }
        PriceError::TooLarge => "Ensure that there are no more than 10 digits in total.",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::models::validation::{NOT_NULL, REQUIRED};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn existing() -> Item {
        let now = Utc::now();
        let price = Price::new(dec("89.99")).unwrap();
        Item {
            id: ItemId::new(6),
            name: "Headphones".to_owned(),
            description: Some("Wireless headphones".to_owned()),
            category: CategoryId::new(1),
            category_name: "Electronics".to_owned(),
            supplier: SupplierId::new(1),
            supplier_name: "ElectroTech Inc.".to_owned(),
            price,
            stock_quantity: 5,
            threshold: 5,
            stock_value: price.stock_value(5),
            created_by: "admin".to_owned(),
            created_by_id: AccountId::new(1),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_create_applies_stock_defaults() {
        let payload: ItemPayload = serde_json::from_str(
            r#"{"name": "Cable", "category": 1, "supplier": 2, "price": "4.50"}"#,
        )
        .unwrap();
        let input = payload.validate().unwrap();
        assert_eq!(input.stock.quantity(), 0);
        assert_eq!(input.stock.threshold(), DEFAULT_THRESHOLD);
        assert_eq!(input.price.to_string(), "4.50");
        assert_eq!(input.category, CategoryId::new(1));
    }

    #[test]
    fn test_price_accepts_number() {
        let payload: ItemPayload = serde_json::from_str(
            r#"{"name": "Cable", "category": 1, "supplier": 2, "price": 4.5}"#,
        )
        .unwrap();
        assert_eq!(payload.validate().unwrap().price.to_string(), "4.50");
    }

    #[test]
    fn test_missing_required_fields_are_all_reported() {
        let payload: ItemPayload = serde_json::from_str(r#"{"stock_quantity": -1}"#).unwrap();
        let errors = payload.validate().unwrap_err();
        for field in ["name", "category", "supplier", "price"] {
            assert_eq!(errors.get(field).unwrap(), [REQUIRED], "{field}");
        }
        assert_eq!(errors.get("stock_quantity").unwrap(), [NON_NEGATIVE]);
    }

    #[test]
    fn test_price_rules() {
        let base = r#""name": "Cable", "category": 1, "supplier": 2"#;

        let negative: ItemPayload =
            serde_json::from_str(&format!(r#"{{{base}, "price": "-1.00"}}"#)).unwrap();
        assert_eq!(negative.validate().unwrap_err().get("price").unwrap(), [NON_NEGATIVE]);

        let precise: ItemPayload =
            serde_json::from_str(&format!(r#"{{{base}, "price": "1.999"}}"#)).unwrap();
        assert!(
            precise.validate().unwrap_err().get("price").unwrap()[0].contains("2 decimal places")
        );

        let huge: ItemPayload =
            serde_json::from_str(&format!(r#"{{{base}, "price": "123456789.00"}}"#)).unwrap();
        assert!(huge.validate().unwrap_err().get("price").unwrap()[0].contains("10 digits"));
    }

    #[test]
    fn test_partial_update_changes_only_supplied_fields() {
        let payload: ItemPayload = serde_json::from_str(r#"{"stock_quantity": 2}"#).unwrap();
        let input = payload.over(&existing()).validate().unwrap();
        assert_eq!(input.name, "Headphones");
        assert_eq!(input.price.to_string(), "89.99");
        assert_eq!(input.stock.quantity(), 2);
        assert_eq!(input.stock.threshold(), 5);
        assert!(input.stock.is_below_threshold());
    }

    #[test]
    fn test_full_update_keeps_stock_when_omitted() {
        let payload: ItemPayload = serde_json::from_str(
            r#"{"name": "Headset", "category": 1, "supplier": 1, "price": "79.99"}"#,
        )
        .unwrap();
        let input = payload.over_optional(&existing()).validate().unwrap();
        assert_eq!(input.name, "Headset");
        assert_eq!(input.price.to_string(), "79.99");
        assert_eq!(input.stock.quantity(), 5);
        assert_eq!(input.stock.threshold(), 5);
        assert_eq!(input.description.as_deref(), Some("Wireless headphones"));
    }

    #[test]
    fn test_full_update_still_requires_core_fields() {
        let payload: ItemPayload = serde_json::from_str(r#"{"name": "Headset"}"#).unwrap();
        let errors = payload.over_optional(&existing()).validate().unwrap_err();
        for field in ["category", "supplier", "price"] {
            assert_eq!(errors.get(field).unwrap(), [REQUIRED], "{field}");
        }
        assert!(errors.get("stock_quantity").is_none());
    }

    #[test]
    fn test_partial_update_rejects_null_threshold() {
        let payload: ItemPayload = serde_json::from_str(r#"{"threshold": null}"#).unwrap();
        let errors = payload.over(&existing()).validate().unwrap_err();
        assert_eq!(errors.get("threshold").unwrap(), [NOT_NULL]);
    }

    #[test]
    fn test_item_json_shape() {
        let json = serde_json::to_value(existing()).unwrap();
        assert_eq!(json["price"], "89.99");
        assert_eq!(json["stock_value"], "449.95");
        assert_eq!(json["category"], 1);
        assert_eq!(json["category_name"], "Electronics");
        assert_eq!(json["supplier_name"], "ElectroTech Inc.");
        assert_eq!(json["created_by"], "admin");
        assert!(json.get("created_by_id").is_none());
    }

    #[test]
    fn test_item_on_threshold_is_not_below() {
        let item = existing();
        let level = StockLevel::new(item.stock_quantity, item.threshold).unwrap();
        assert!(!level.is_below_threshold());
    }
}
