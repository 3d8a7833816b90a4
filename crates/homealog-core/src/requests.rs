//! Typed request structures for every inventory action.
//!
//! Requests reject unknown fields at deserialization time and are checked
//! field by field with [`Validate`] before any store call is issued.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::HomealogError;
use crate::types::{default_location_type, default_quantity};

/// Field-level validation run before a request reaches the graph store.
pub trait Validate {
    fn validate(&self) -> Result<(), HomealogError>;
}

const ISO_DATE: &str = "%Y-%m-%d";

fn require_name(field: &'static str, value: &str) -> Result<(), HomealogError> {
    if value.trim().is_empty() {
        return Err(HomealogError::MissingField(field));
    }
    Ok(())
}

// ── Creation ──────────────────────────────────────────────────────

/// Arguments for `create_item`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NewItem {
    /// Item name (unique).
    pub name: String,
    /// Item description.
    #[serde(default)]
    pub description: String,
    /// Purchase date (ISO format, YYYY-MM-DD).
    #[serde(default)]
    pub purchase_date: Option<String>,
    /// Monetary value.
    #[serde(default)]
    pub value: Option<f64>,
    /// Number of items.
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    /// Additional notes.
    #[serde(default)]
    pub notes: String,
}

impl NewItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            purchase_date: None,
            value: None,
            quantity: default_quantity(),
            notes: String::new(),
        }
    }
}

impl Validate for NewItem {
    fn validate(&self) -> Result<(), HomealogError> {
        require_name("name", &self.name)?;

        if self.quantity < 1 {
            return Err(HomealogError::invalid(
                "quantity",
                format!("must be at least 1, got {}", self.quantity),
            ));
        }

        if let Some(value) = self.value {
            if !value.is_finite() || value < 0.0 {
                return Err(HomealogError::invalid(
                    "value",
                    format!("must be a non-negative amount, got {value}"),
                ));
            }
        }

        if let Some(date) = &self.purchase_date {
            let parsed = NaiveDate::parse_from_str(date, ISO_DATE).map_err(|e| {
                HomealogError::invalid("purchase_date", format!("'{date}' is not an ISO-8601 date: {e}"))
            })?;
            // chrono accepts unpadded fields; stored dates must be YYYY-MM-DD exactly.
            if parsed.format(ISO_DATE).to_string() != *date {
                return Err(HomealogError::invalid(
                    "purchase_date",
                    format!("'{date}' must be written as YYYY-MM-DD"),
                ));
            }
        }

        Ok(())
    }
}

/// Arguments for `create_location`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NewLocation {
    /// Location name (unique).
    pub name: String,
    /// Type (room, shelf, box, etc.).
    #[serde(default = "default_location_type")]
    pub location_type: String,
    /// Location description.
    #[serde(default)]
    pub description: String,
}

impl NewLocation {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location_type: default_location_type(),
            description: String::new(),
        }
    }
}

impl Validate for NewLocation {
    fn validate(&self) -> Result<(), HomealogError> {
        require_name("name", &self.name)?;
        if self.location_type.trim().is_empty() {
            return Err(HomealogError::invalid("location_type", "must not be blank"));
        }
        Ok(())
    }
}

/// Arguments for `create_category`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NewCategory {
    /// Category name (unique).
    pub name: String,
    /// Category description.
    #[serde(default)]
    pub description: String,
}

impl Validate for NewCategory {
    fn validate(&self) -> Result<(), HomealogError> {
        require_name("name", &self.name)
    }
}

/// Arguments for `create_person`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NewPerson {
    /// Person name (unique).
    pub name: String,
}

impl Validate for NewPerson {
    fn validate(&self) -> Result<(), HomealogError> {
        require_name("name", &self.name)
    }
}

// ── Linking ───────────────────────────────────────────────────────

/// Arguments for `link_item_to_location`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LinkItemToLocation {
    /// Name of the item.
    pub item_name: String,
    /// Name of the location.
    pub location_name: String,
}

impl Validate for LinkItemToLocation {
    fn validate(&self) -> Result<(), HomealogError> {
        require_name("item_name", &self.item_name)?;
        require_name("location_name", &self.location_name)
    }
}

/// Arguments for `link_item_to_category`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LinkItemToCategory {
    /// Name of the item.
    pub item_name: String,
    /// Name of the category.
    pub category_name: String,
}

impl Validate for LinkItemToCategory {
    fn validate(&self) -> Result<(), HomealogError> {
        require_name("item_name", &self.item_name)?;
        require_name("category_name", &self.category_name)
    }
}

/// Arguments for `link_item_to_owner`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LinkItemToOwner {
    /// Name of the item.
    pub item_name: String,
    /// Name of the person who owns it.
    pub person_name: String,
}

impl Validate for LinkItemToOwner {
    fn validate(&self) -> Result<(), HomealogError> {
        require_name("item_name", &self.item_name)?;
        require_name("person_name", &self.person_name)
    }
}

// ── Lookups ───────────────────────────────────────────────────────

/// Arguments for `find_items_in_location`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LocationQuery {
    /// Name of the location.
    pub location_name: String,
}

impl Validate for LocationQuery {
    fn validate(&self) -> Result<(), HomealogError> {
        require_name("location_name", &self.location_name)
    }
}

/// Arguments for `find_items_by_category`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CategoryQuery {
    /// Name of the category.
    pub category_name: String,
}

impl Validate for CategoryQuery {
    fn validate(&self) -> Result<(), HomealogError> {
        require_name("category_name", &self.category_name)
    }
}

/// Arguments for `get_item_details`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ItemQuery {
    /// Name of the item.
    pub item_name: String,
}

impl Validate for ItemQuery {
    fn validate(&self) -> Result<(), HomealogError> {
        require_name("item_name", &self.item_name)
    }
}

/// Arguments for actions that take none.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NoArguments {}

impl Validate for NoArguments {
    fn validate(&self) -> Result<(), HomealogError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_item_defaults() {
        let item: NewItem = serde_json::from_value(json!({"name": "Samsung TV"})).unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.description, "");
        assert_eq!(item.value, None);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn new_item_rejects_unknown_field() {
        let err = serde_json::from_value::<NewItem>(json!({"name": "TV", "colour": "black"}))
            .unwrap_err();
        assert!(err.to_string().contains("unknown field `colour`"));
    }

    #[test]
    fn new_item_requires_name() {
        let err = serde_json::from_value::<NewItem>(json!({"value": 10.0})).unwrap_err();
        assert!(err.to_string().contains("missing field `name`"));

        let blank = NewItem::named("   ");
        assert!(matches!(
            blank.validate(),
            Err(HomealogError::MissingField("name"))
        ));
    }

    #[test]
    fn new_item_field_checks() {
        let mut item = NewItem::named("Lamp");
        item.quantity = 0;
        assert!(matches!(
            item.validate(),
            Err(HomealogError::InvalidField { field: "quantity", .. })
        ));

        let mut item = NewItem::named("Lamp");
        item.value = Some(-5.0);
        assert!(matches!(
            item.validate(),
            Err(HomealogError::InvalidField { field: "value", .. })
        ));

        let mut item = NewItem::named("Lamp");
        item.value = Some(f64::NAN);
        assert!(item.validate().is_err());

        let mut item = NewItem::named("Lamp");
        item.purchase_date = Some("last tuesday".to_string());
        assert!(matches!(
            item.validate(),
            Err(HomealogError::InvalidField { field: "purchase_date", .. })
        ));

        for unpadded in ["2024-2-9", "2024-02-9", "2024-2-09"] {
            let mut item = NewItem::named("Lamp");
            item.purchase_date = Some(unpadded.to_string());
            assert!(
                matches!(
                    item.validate(),
                    Err(HomealogError::InvalidField { field: "purchase_date", .. })
                ),
                "{unpadded} should be rejected"
            );
        }

        let mut item = NewItem::named("Lamp");
        item.purchase_date = Some("2024-02-29".to_string());
        item.value = Some(0.0);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn new_location_defaults_to_room() {
        let loc: NewLocation = serde_json::from_value(json!({"name": "Garage"})).unwrap();
        assert_eq!(loc.location_type, "room");
        assert_eq!(loc, NewLocation::named("Garage"));
    }

    #[test]
    fn link_requests_require_both_names() {
        let err = serde_json::from_value::<LinkItemToLocation>(json!({"item_name": "TV"}))
            .unwrap_err();
        assert!(err.to_string().contains("location_name"));

        let link = LinkItemToCategory {
            item_name: "TV".to_string(),
            category_name: String::new(),
        };
        assert!(matches!(
            link.validate(),
            Err(HomealogError::MissingField("category_name"))
        ));
    }

    #[test]
    fn no_arguments_rejects_extras() {
        assert!(serde_json::from_value::<NoArguments>(json!({})).is_ok());
        assert!(serde_json::from_value::<NoArguments>(json!({"limit": 5})).is_err());
    }
}
