//! Category domain types and write payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{AccountId, CategoryId};

use super::validation::{Field, FieldErrors, nullable, optional_text, required_text, stored, stored_opt};

/// Maximum length of a category name.
pub const NAME_MAX_LEN: usize = 100;

/// A category of items.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    /// Username of the creating account.
    pub created_by: String,
    #[serde(skip)]
    pub created_by_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated category fields, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}

/// Request body for create, full update and partial update.
///
/// Unknown keys such as `created_by` are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPayload {
    #[serde(default, deserialize_with = "nullable")]
    pub name: Field<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Field<String>,
}

impl CategoryPayload {
    /// Fill every field the payload leaves out from the stored category.
    #[must_use]
    pub fn over(self, existing: &Category) -> Self {
        Self {
            name: self.name.or_else(|| stored(existing.name.clone())),
            description: self
                .description
                .or_else(|| stored_opt(existing.description.clone())),
        }
    }

    /// Fill only the optional fields the payload leaves out. `name` stays
    /// as sent, so a full update without it is still rejected.
    #[must_use]
    pub fn over_optional(self, existing: &Category) -> Self {
        Self {
            name: self.name,
            description: self
                .description
                .or_else(|| stored_opt(existing.description.clone())),
        }
    }

    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(self) -> Result<CategoryInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required_text(&mut errors, "name", self.name, NAME_MAX_LEN);
        let description = optional_text(&mut errors, "description", self.description, None);

        match name {
            Some(name) => errors.finish(CategoryInput { name, description }),
            None => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::validation::{NOT_NULL, REQUIRED};

    fn existing() -> Category {
        let now = Utc::now();
        Category {
            id: CategoryId::new(1),
            name: "Electronics".to_owned(),
            description: Some("Electronic devices and accessories".to_owned()),
            created_by: "admin".to_owned(),
            created_by_id: AccountId::new(1),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_create_leaves_omitted_description_empty() {
        let payload: CategoryPayload = serde_json::from_str(r#"{"name": "Gadgets"}"#).unwrap();
        let input = payload.validate().unwrap();
        assert_eq!(input.name, "Gadgets");
        assert_eq!(input.description, None);
    }

    #[test]
    fn test_full_update_keeps_omitted_description() {
        let payload: CategoryPayload = serde_json::from_str(r#"{"name": "Gadgets"}"#).unwrap();
        let input = payload.over_optional(&existing()).validate().unwrap();
        assert_eq!(input.name, "Gadgets");
        assert_eq!(
            input.description.as_deref(),
            Some("Electronic devices and accessories")
        );

        let cleared: CategoryPayload =
            serde_json::from_str(r#"{"name": "Gadgets", "description": null}"#).unwrap();
        let input = cleared.over_optional(&existing()).validate().unwrap();
        assert_eq!(input.description, None);
    }

    #[test]
    fn test_full_update_still_requires_name() {
        let payload: CategoryPayload =
            serde_json::from_str(r#"{"description": "Gizmos"}"#).unwrap();
        let errors = payload.over_optional(&existing()).validate().unwrap_err();
        assert_eq!(errors.get("name").unwrap(), [REQUIRED]);
    }

    #[test]
    fn test_partial_update_keeps_stored_fields() {
        let payload: CategoryPayload =
            serde_json::from_str(r#"{"description": "Gizmos"}"#).unwrap();
        let input = payload.over(&existing()).validate().unwrap();
        assert_eq!(input.name, "Electronics");
        assert_eq!(input.description.as_deref(), Some("Gizmos"));
    }

    #[test]
    fn test_partial_update_null_clears_description() {
        let payload: CategoryPayload = serde_json::from_str(r#"{"description": null}"#).unwrap();
        let input = payload.over(&existing()).validate().unwrap();
        assert_eq!(input.description, None);
    }

    #[test]
    fn test_name_is_required_and_not_nullable() {
        let missing: CategoryPayload = serde_json::from_str("{}").unwrap();
        let errors = missing.validate().unwrap_err();
        assert_eq!(errors.get("name").unwrap(), [REQUIRED]);

        let null: CategoryPayload = serde_json::from_str(r#"{"name": null}"#).unwrap();
        let errors = null.over(&existing()).validate().unwrap_err();
        assert_eq!(errors.get("name").unwrap(), [NOT_NULL]);
    }

    #[test]
    fn test_created_by_in_body_is_ignored() {
        let payload: CategoryPayload =
            serde_json::from_str(r#"{"name": "Food", "created_by": 99}"#).unwrap();
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_serialized_category_hides_creator_id() {
        let json = serde_json::to_value(existing()).unwrap();
        assert_eq!(json["created_by"], "admin");
        assert!(json.get("created_by_id").is_none());
    }
}
