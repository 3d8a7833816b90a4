//! homealog-core: Schema, domain records, and request validation for Home-Alog.
//!
//! This crate provides the foundational types shared by the graph layer and the
//! tool server:
//! - Node kinds (Item, Location, Category, Person) and their property shapes
//! - Relationship kinds (LOCATED_IN, BELONGS_TO, OWNED_BY)
//! - Typed request structures for every inventory action
//! - Common error types

pub mod error;
pub mod requests;
pub mod types;

pub use error::HomealogError;
pub use requests::Validate;
pub use types::{
    Category, Item, ItemDetails, Location, NodeKind, Person, PropertySpec, RelationKind, ValueType,
};
