//! Named actions: typed requests in, tagged outcomes out.
//!
//! Front ends resolve a tool name and its JSON arguments into an [`Action`]
//! with [`Action::parse`], then run it through [`GraphOperations::dispatch`].
//! Unknown actions, unknown fields, and missing required fields are rejected
//! before any store call.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use homealog_core::requests::{
    CategoryQuery, ItemQuery, LinkItemToCategory, LinkItemToLocation, LinkItemToOwner,
    LocationQuery, NewCategory, NewItem, NewLocation, NewPerson, NoArguments,
};
use homealog_core::{
    Category, HomealogError, Item, ItemDetails, Location, Person, RelationKind, Validate,
};

use crate::client::{GraphError, GraphStore};
use crate::operations::GraphOperations;

/// One invocable inventory action with its validated arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CreateItem(NewItem),
    CreateLocation(NewLocation),
    CreateCategory(NewCategory),
    CreatePerson(NewPerson),
    LinkItemToLocation(LinkItemToLocation),
    LinkItemToCategory(LinkItemToCategory),
    LinkItemToOwner(LinkItemToOwner),
    FindItemsInLocation(LocationQuery),
    FindItemsByCategory(CategoryQuery),
    GetItemDetails(ItemQuery),
    ListLocations,
    ListCategories,
}

impl Action {
    pub const NAMES: [&'static str; 12] = [
        "create_item",
        "create_location",
        "create_category",
        "create_person",
        "link_item_to_location",
        "link_item_to_category",
        "link_item_to_owner",
        "find_items_in_location",
        "find_items_by_category",
        "get_item_details",
        "list_locations",
        "list_categories",
    ];

    /// Resolve an action name and its JSON arguments.
    ///
    /// `null` arguments are treated as an empty object.
    pub fn parse(name: &str, arguments: Value) -> Result<Self, HomealogError> {
        let action = match name {
            "create_item" => Self::CreateItem(arguments_for(name, arguments)?),
            "create_location" => Self::CreateLocation(arguments_for(name, arguments)?),
            "create_category" => Self::CreateCategory(arguments_for(name, arguments)?),
            "create_person" => Self::CreatePerson(arguments_for(name, arguments)?),
            "link_item_to_location" => Self::LinkItemToLocation(arguments_for(name, arguments)?),
            "link_item_to_category" => Self::LinkItemToCategory(arguments_for(name, arguments)?),
            "link_item_to_owner" => Self::LinkItemToOwner(arguments_for(name, arguments)?),
            "find_items_in_location" => Self::FindItemsInLocation(arguments_for(name, arguments)?),
            "find_items_by_category" => Self::FindItemsByCategory(arguments_for(name, arguments)?),
            "get_item_details" => Self::GetItemDetails(arguments_for(name, arguments)?),
            "list_locations" => {
                arguments_for::<NoArguments>(name, arguments)?;
                Self::ListLocations
            }
            "list_categories" => {
                arguments_for::<NoArguments>(name, arguments)?;
                Self::ListCategories
            }
            other => return Err(HomealogError::UnknownAction(other.to_string())),
        };
        Ok(action)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateItem(_) => "create_item",
            Self::CreateLocation(_) => "create_location",
            Self::CreateCategory(_) => "create_category",
            Self::CreatePerson(_) => "create_person",
            Self::LinkItemToLocation(_) => "link_item_to_location",
            Self::LinkItemToCategory(_) => "link_item_to_category",
            Self::LinkItemToOwner(_) => "link_item_to_owner",
            Self::FindItemsInLocation(_) => "find_items_in_location",
            Self::FindItemsByCategory(_) => "find_items_by_category",
            Self::GetItemDetails(_) => "get_item_details",
            Self::ListLocations => "list_locations",
            Self::ListCategories => "list_categories",
        }
    }

    /// Run the field-level checks of the carried request.
    pub fn validate(&self) -> Result<(), HomealogError> {
        match self {
            Self::CreateItem(r) => r.validate(),
            Self::CreateLocation(r) => r.validate(),
            Self::CreateCategory(r) => r.validate(),
            Self::CreatePerson(r) => r.validate(),
            Self::LinkItemToLocation(r) => r.validate(),
            Self::LinkItemToCategory(r) => r.validate(),
            Self::LinkItemToOwner(r) => r.validate(),
            Self::FindItemsInLocation(r) => r.validate(),
            Self::FindItemsByCategory(r) => r.validate(),
            Self::GetItemDetails(r) => r.validate(),
            Self::ListLocations | Self::ListCategories => Ok(()),
        }
    }
}

fn arguments_for<T: DeserializeOwned + Validate>(
    action: &str,
    arguments: Value,
) -> Result<T, HomealogError> {
    let arguments = match arguments {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    let request: T =
        serde_json::from_value(arguments).map_err(|e| HomealogError::InvalidArguments {
            action: action.to_string(),
            reason: e.to_string(),
        })?;
    request.validate()?;
    Ok(request)
}

/// Result of a dispatched action.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    ItemCreated { item: Item },
    LocationCreated { location: Location },
    CategoryCreated { category: Category },
    PersonCreated { person: Person },
    Link {
        relation: RelationKind,
        source: String,
        target: String,
        linked: bool,
    },
    Items { items: Vec<Item> },
    ItemDetails { details: ItemDetails },
    ItemNotFound { name: String },
    Locations { locations: Vec<Location> },
    Categories { categories: Vec<Category> },
}

impl<S: GraphStore> GraphOperations<S> {
    /// Execute one action against the store.
    pub async fn dispatch(&self, action: Action) -> Result<ActionOutcome, GraphError> {
        tracing::debug!(action = action.name(), "Dispatching action");
        action.validate()?;

        let outcome = match action {
            Action::CreateItem(req) => ActionOutcome::ItemCreated {
                item: self.create_item(&req).await?,
            },
            Action::CreateLocation(req) => ActionOutcome::LocationCreated {
                location: self.create_location(&req).await?,
            },
            Action::CreateCategory(req) => ActionOutcome::CategoryCreated {
                category: self.create_category(&req).await?,
            },
            Action::CreatePerson(req) => ActionOutcome::PersonCreated {
                person: self.create_person(&req).await?,
            },
            Action::LinkItemToLocation(req) => {
                let linked = self
                    .link_item_to_location(&req.item_name, &req.location_name)
                    .await?;
                link_outcome(RelationKind::LocatedIn, req.item_name, req.location_name, linked)
            }
            Action::LinkItemToCategory(req) => {
                let linked = self
                    .link_item_to_category(&req.item_name, &req.category_name)
                    .await?;
                link_outcome(RelationKind::BelongsTo, req.item_name, req.category_name, linked)
            }
            Action::LinkItemToOwner(req) => {
                let linked = self
                    .link_item_to_owner(&req.item_name, &req.person_name)
                    .await?;
                link_outcome(RelationKind::OwnedBy, req.item_name, req.person_name, linked)
            }
            Action::FindItemsInLocation(req) => ActionOutcome::Items {
                items: self.find_items_in_location(&req.location_name).await?,
            },
            Action::FindItemsByCategory(req) => ActionOutcome::Items {
                items: self.find_items_by_category(&req.category_name).await?,
            },
            Action::GetItemDetails(req) => match self.get_item_details(&req.item_name).await? {
                Some(details) => ActionOutcome::ItemDetails { details },
                None => ActionOutcome::ItemNotFound {
                    name: req.item_name,
                },
            },
            Action::ListLocations => ActionOutcome::Locations {
                locations: self.list_all_locations().await?,
            },
            Action::ListCategories => ActionOutcome::Categories {
                categories: self.list_all_categories().await?,
            },
        };
        Ok(outcome)
    }
}

fn link_outcome(relation: RelationKind, source: String, target: String, linked: bool) -> ActionOutcome {
    ActionOutcome::Link {
        relation,
        source,
        target,
        linked,
    }
}
