//! Supplier domain types and write payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{AccountId, Email, SupplierId};

use super::validation::{Field, FieldErrors, nullable, optional_text, required_text, stored, stored_opt};

pub const NAME_MAX_LEN: usize = 100;
pub const CONTACT_PERSON_MAX_LEN: usize = 100;
pub const PHONE_MAX_LEN: usize = 20;

/// A vendor that items are sourced from.
#[derive(Debug, Clone, Serialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Username of the creating account.
    pub created_by: String,
    #[serde(skip)]
    pub created_by_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated supplier fields, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierInput {
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Request body for create, full update and partial update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupplierPayload {
    #[serde(default, deserialize_with = "nullable")]
    pub name: Field<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub contact_person: Field<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Field<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Field<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub address: Field<String>,
}

impl SupplierPayload {
    /// Fill every field the payload leaves out from the stored supplier.
    #[must_use]
    pub fn over(self, existing: &Supplier) -> Self {
        let filled = self.over_optional(existing);
        Self {
            name: filled.name.or_else(|| stored(existing.name.clone())),
            ..filled
        }
    }

    /// Fill the contact fields the payload leaves out, keeping `name` as sent.
    #[must_use]
    pub fn over_optional(self, existing: &Supplier) -> Self {
        Self {
            name: self.name,
            contact_person: self
                .contact_person
                .or_else(|| stored_opt(existing.contact_person.clone())),
            email: self.email.or_else(|| {
                stored_opt(existing.email.as_ref().map(|e| e.as_str().to_owned()))
            }),
            phone: self.phone.or_else(|| stored_opt(existing.phone.clone())),
            address: self.address.or_else(|| stored_opt(existing.address.clone())),
        }
    }

    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(self) -> Result<SupplierInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required_text(&mut errors, "name", self.name, NAME_MAX_LEN);
        let contact_person = optional_text(
            &mut errors,
            "contact_person",
            self.contact_person,
            Some(CONTACT_PERSON_MAX_LEN),
        );
        let email = optional_text(&mut errors, "email", self.email, None).and_then(|raw| {
            Email::parse(&raw)
                .map_err(|_| errors.add("email", "Enter a valid email address."))
                .ok()
        });
        let phone = optional_text(&mut errors, "phone", self.phone, Some(PHONE_MAX_LEN));
        let address = optional_text(&mut errors, "address", self.address, None);

        match name {
            Some(name) => errors.finish(SupplierInput {
                name,
                contact_person,
                email,
                phone,
                address,
            }),
            None => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::validation::REQUIRED;

    fn existing() -> Supplier {
        let now = Utc::now();
        Supplier {
            id: SupplierId::new(3),
            name: "Fresh Foods Ltd.".to_owned(),
            contact_person: Some("Jane Smith".to_owned()),
            email: Some(Email::parse("jane@freshfoods.com").unwrap()),
            phone: Some("098-765-4321".to_owned()),
            address: Some("456 Food Ave, Chicago, IL".to_owned()),
            created_by: "admin".to_owned(),
            created_by_id: AccountId::new(1),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_invalid_email_is_a_field_error() {
        let payload: SupplierPayload =
            serde_json::from_str(r#"{"name": "Acme", "email": "nobody"}"#).unwrap();
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.get("email").unwrap(), ["Enter a valid email address."]);
        assert!(errors.get("name").is_none());
    }

    #[test]
    fn test_phone_length_is_enforced() {
        let payload: SupplierPayload =
            serde_json::from_str(r#"{"name": "Acme", "phone": "012345678901234567890"}"#)
                .unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.get("phone").unwrap()[0].contains("no more than 20"));
    }

    #[test]
    fn test_partial_update_overlays_stored_supplier() {
        let payload: SupplierPayload =
            serde_json::from_str(r#"{"phone": null, "contact_person": "Ann Lee"}"#).unwrap();
        let input = payload.over(&existing()).validate().unwrap();
        assert_eq!(input.name, "Fresh Foods Ltd.");
        assert_eq!(input.contact_person.as_deref(), Some("Ann Lee"));
        assert_eq!(input.phone, None);
        assert_eq!(
            input.email.as_ref().map(Email::as_str),
            Some("jane@freshfoods.com")
        );
    }

    #[test]
    fn test_create_nulls_omitted_optionals() {
        let payload: SupplierPayload = serde_json::from_str(r#"{"name": "Acme"}"#).unwrap();
        let input = payload.validate().unwrap();
        assert_eq!(input.contact_person, None);
        assert_eq!(input.email, None);
        assert_eq!(input.address, None);
    }

    #[test]
    fn test_full_update_keeps_omitted_optionals() {
        let payload: SupplierPayload =
            serde_json::from_str(r#"{"name": "Fresh Foods", "phone": null}"#).unwrap();
        let input = payload.over_optional(&existing()).validate().unwrap();
        assert_eq!(input.name, "Fresh Foods");
        assert_eq!(input.contact_person.as_deref(), Some("Jane Smith"));
        assert_eq!(
            input.email.as_ref().map(Email::as_str),
            Some("jane@freshfoods.com")
        );
        assert_eq!(input.address.as_deref(), Some("456 Food Ave, Chicago, IL"));
        assert_eq!(input.phone, None);
    }

    #[test]
    fn test_full_update_still_requires_name() {
        let payload: SupplierPayload =
            serde_json::from_str(r#"{"contact_person": "Ann Lee"}"#).unwrap();
        let errors = payload.over_optional(&existing()).validate().unwrap_err();
        assert_eq!(errors.get("name").unwrap(), [REQUIRED]);
    }
}
