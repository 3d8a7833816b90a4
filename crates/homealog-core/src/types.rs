//! Core schema and domain records for the home inventory graph.
//!
//! The graph is closed over four node kinds and three relationship kinds
//! (plus `CONTAINS`, which is reserved). Every node kind is keyed by a
//! globally unique `name`.

use serde::{Deserialize, Serialize};

// ── Node Kinds ────────────────────────────────────────────────────

/// The closed set of node labels in the inventory graph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Item,
    Location,
    Category,
    Person,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Item,
        NodeKind::Location,
        NodeKind::Category,
        NodeKind::Person,
    ];

    /// The Neo4j label for this kind.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Item => "Item",
            NodeKind::Location => "Location",
            NodeKind::Category => "Category",
            NodeKind::Person => "Person",
        }
    }

    /// The property every node of this kind is uniquely keyed by.
    pub fn key_property(&self) -> &'static str {
        "name"
    }

    /// Name of the uniqueness constraint on the key property.
    pub fn constraint_name(&self) -> &'static str {
        match self {
            NodeKind::Item => "item_name",
            NodeKind::Location => "location_name",
            NodeKind::Category => "category_name",
            NodeKind::Person => "person_name",
        }
    }

    /// The stored property shape, in storage order.
    pub fn properties(&self) -> &'static [PropertySpec] {
        match self {
            NodeKind::Item => ITEM_PROPERTIES,
            NodeKind::Location => LOCATION_PROPERTIES,
            NodeKind::Category => CATEGORY_PROPERTIES,
            NodeKind::Person => PERSON_PROPERTIES,
        }
    }

    pub fn property(&self, name: &str) -> Option<&'static PropertySpec> {
        self.properties().iter().find(|p| p.name == name)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Property Shapes ───────────────────────────────────────────────

/// Semantic type of a stored property.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Text,
    /// ISO-8601 calendar date string (`YYYY-MM-DD`).
    Date,
    /// Non-negative monetary amount.
    Money,
    /// Integer count, at least 1.
    Count,
}

/// One property of a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub value_type: ValueType,
    pub required: bool,
}

const fn required(name: &'static str, value_type: ValueType) -> PropertySpec {
    PropertySpec {
        name,
        value_type,
        required: true,
    }
}

const fn optional(name: &'static str, value_type: ValueType) -> PropertySpec {
    PropertySpec {
        name,
        value_type,
        required: false,
    }
}

const ITEM_PROPERTIES: &[PropertySpec] = &[
    required("name", ValueType::Text),
    optional("description", ValueType::Text),
    optional("purchase_date", ValueType::Date),
    optional("value", ValueType::Money),
    optional("quantity", ValueType::Count),
    optional("notes", ValueType::Text),
];

const LOCATION_PROPERTIES: &[PropertySpec] = &[
    required("name", ValueType::Text),
    optional("type", ValueType::Text),
    optional("description", ValueType::Text),
];

const CATEGORY_PROPERTIES: &[PropertySpec] = &[
    required("name", ValueType::Text),
    optional("description", ValueType::Text),
];

const PERSON_PROPERTIES: &[PropertySpec] = &[required("name", ValueType::Text)];

// ── Relationship Kinds ────────────────────────────────────────────

/// Directed relationship types. Relationships carry no properties.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKind {
    LocatedIn,
    BelongsTo,
    OwnedBy,
    /// Reserved for nested storage; no operation creates it.
    Contains,
}

impl RelationKind {
    /// The Cypher relationship type string.
    pub fn cypher(&self) -> &'static str {
        match self {
            RelationKind::LocatedIn => "LOCATED_IN",
            RelationKind::BelongsTo => "BELONGS_TO",
            RelationKind::OwnedBy => "OWNED_BY",
            RelationKind::Contains => "CONTAINS",
        }
    }

    pub fn source(&self) -> NodeKind {
        match self {
            RelationKind::Contains => NodeKind::Location,
            _ => NodeKind::Item,
        }
    }

    pub fn target(&self) -> NodeKind {
        match self {
            RelationKind::LocatedIn => NodeKind::Location,
            RelationKind::BelongsTo => NodeKind::Category,
            RelationKind::OwnedBy => NodeKind::Person,
            RelationKind::Contains => NodeKind::Location,
        }
    }

    /// A source node holds at most one edge of an exclusive kind.
    /// An item is placed in one location at a time.
    pub fn is_exclusive(&self) -> bool {
        matches!(self, RelationKind::LocatedIn)
    }

    pub fn is_reserved(&self) -> bool {
        matches!(self, RelationKind::Contains)
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.cypher())
    }
}

// ── Domain Records ────────────────────────────────────────────────

pub(crate) fn default_quantity() -> i64 {
    1
}

pub(crate) fn default_location_type() -> String {
    "room".to_string()
}

/// A physical possession tracked in the inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub notes: String,
}

/// A place items are kept: a room, a shelf, a box.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    #[serde(rename = "type", default = "default_location_type")]
    pub location_type: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub name: String,
}

/// An item together with the names of its related nodes.
///
/// Each relation is `None` when the item has no edge of that kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemDetails {
    #[serde(flatten)]
    pub item: Item,
    pub location: Option<String>,
    pub category: Option<String>,
    pub owner: Option<String>,
}
