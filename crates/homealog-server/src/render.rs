//! Text rendering of action outcomes for tool clients.

use homealog_core::{HomealogError, RelationKind};
use homealog_graph::ActionOutcome;
use serde::Serialize;

/// Render an outcome as the text returned to the caller.
///
/// Records and listings are pretty-printed JSON; link results and missing
/// items are short sentences.
pub fn render(outcome: &ActionOutcome) -> Result<String, HomealogError> {
    let text = match outcome {
        ActionOutcome::ItemCreated { item } => format!("Created item: {}", pretty(item)?),
        ActionOutcome::LocationCreated { location } => {
            format!("Created location: {}", pretty(location)?)
        }
        ActionOutcome::CategoryCreated { category } => {
            format!("Created category: {}", pretty(category)?)
        }
        ActionOutcome::PersonCreated { person } => format!("Created person: {}", pretty(person)?),
        ActionOutcome::Link {
            relation,
            source,
            target,
            linked: true,
        } => match relation {
            RelationKind::LocatedIn => format!("Linked {source} to {target}"),
            RelationKind::BelongsTo => format!("Linked {source} to category {target}"),
            RelationKind::OwnedBy => format!("Linked {source} to owner {target}"),
            RelationKind::Contains => format!("Linked {source} into {target}"),
        },
        ActionOutcome::Link {
            relation,
            linked: false,
            ..
        } => format!(
            "Failed to create link. Check that both {} and {} exist.",
            relation.source().label().to_lowercase(),
            relation.target().label().to_lowercase()
        ),
        ActionOutcome::Items { items } => pretty(items)?,
        ActionOutcome::ItemDetails { details } => pretty(details)?,
        ActionOutcome::ItemNotFound { name } => format!("Item '{name}' not found"),
        ActionOutcome::Locations { locations } => pretty(locations)?,
        ActionOutcome::Categories { categories } => pretty(categories)?,
    };
    Ok(text)
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, HomealogError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use homealog_core::{Item, ItemDetails, Location};

    fn item(name: &str) -> Item {
        Item {
            name: name.to_string(),
            description: String::new(),
            purchase_date: None,
            value: Some(799.99),
            quantity: 1,
            notes: String::new(),
        }
    }

    fn link(relation: RelationKind, linked: bool) -> ActionOutcome {
        ActionOutcome::Link {
            relation,
            source: "Samsung TV".to_string(),
            target: "Living Room".to_string(),
            linked,
        }
    }

    #[test]
    fn created_item_embeds_pretty_json() {
        let text = render(&ActionOutcome::ItemCreated {
            item: item("Samsung TV"),
        })
        .unwrap();
        assert!(text.starts_with("Created item: {\n  \"name\": \"Samsung TV\""));
        assert!(text.contains("\"value\": 799.99"));
    }

    #[test]
    fn link_messages_by_relation() {
        assert_eq!(
            render(&link(RelationKind::LocatedIn, true)).unwrap(),
            "Linked Samsung TV to Living Room"
        );
        assert_eq!(
            render(&link(RelationKind::BelongsTo, true)).unwrap(),
            "Linked Samsung TV to category Living Room"
        );
        assert_eq!(
            render(&link(RelationKind::LocatedIn, false)).unwrap(),
            "Failed to create link. Check that both item and location exist."
        );
        assert_eq!(
            render(&link(RelationKind::OwnedBy, false)).unwrap(),
            "Failed to create link. Check that both item and person exist."
        );
    }

    #[test]
    fn missing_item_message() {
        let text = render(&ActionOutcome::ItemNotFound {
            name: "NoSuchItem".to_string(),
        })
        .unwrap();
        assert_eq!(text, "Item 'NoSuchItem' not found");
    }

    #[test]
    fn details_flatten_item_fields() {
        let text = render(&ActionOutcome::ItemDetails {
            details: ItemDetails {
                item: item("Samsung TV"),
                location: Some("Living Room".to_string()),
                category: None,
                owner: None,
            },
        })
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["name"], "Samsung TV");
        assert_eq!(json["location"], "Living Room");
        assert!(json["category"].is_null());
    }

    #[test]
    fn empty_listing_is_empty_array() {
        let text = render(&ActionOutcome::Locations {
            locations: Vec::<Location>::new(),
        })
        .unwrap();
        assert_eq!(text, "[]");
    }
}
