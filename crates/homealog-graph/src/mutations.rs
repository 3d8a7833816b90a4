//! Write operations for the inventory graph.
//!
//! Node creation uses plain CREATE so the per-kind uniqueness constraint
//! rejects duplicate names. Linking is a single MATCH ... MERGE statement:
//! it never duplicates an edge and matches nothing when an endpoint is missing.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use homealog_core::requests::{NewCategory, NewItem, NewLocation, NewPerson};
use homealog_core::{Category, Item, Location, NodeKind, Person, RelationKind, Validate};

use crate::client::{GraphError, GraphStore, Statement};
use crate::operations::{column_as, GraphOperations};

impl<S: GraphStore> GraphOperations<S> {
    // ── Node Creation ────────────────────────────────────────────

    /// Create an Item node.
    pub async fn create_item(&self, item: &NewItem) -> Result<Item, GraphError> {
        item.validate()?;
        self.create_node(
            NodeKind::Item,
            &[
                ("name", json!(item.name)),
                ("description", json!(item.description)),
                ("purchase_date", json!(item.purchase_date)),
                ("value", json!(item.value)),
                ("quantity", json!(item.quantity)),
                ("notes", json!(item.notes)),
            ],
        )
        .await
    }

    /// Create a Location node.
    pub async fn create_location(&self, location: &NewLocation) -> Result<Location, GraphError> {
        location.validate()?;
        self.create_node(
            NodeKind::Location,
            &[
                ("name", json!(location.name)),
                ("type", json!(location.location_type)),
                ("description", json!(location.description)),
            ],
        )
        .await
    }

    /// Create a Category node.
    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, GraphError> {
        category.validate()?;
        self.create_node(
            NodeKind::Category,
            &[
                ("name", json!(category.name)),
                ("description", json!(category.description)),
            ],
        )
        .await
    }

    /// Create a Person node.
    pub async fn create_person(&self, person: &NewPerson) -> Result<Person, GraphError> {
        person.validate()?;
        self.create_node(NodeKind::Person, &[("name", json!(person.name))])
            .await
    }

    async fn create_node<T: DeserializeOwned>(
        &self,
        kind: NodeKind,
        values: &[(&str, Value)],
    ) -> Result<T, GraphError> {
        let rows = self.store().execute(create_statement(kind, values)).await?;
        let row = rows
            .first()
            .ok_or_else(|| GraphError::Query(format!("CREATE {kind} returned no rows")))?;
        let node = column_as(row, "node")?;

        tracing::debug!(label = kind.label(), name = ?lookup(values, "name"), "Created node");
        Ok(node)
    }

    // ── Linking ──────────────────────────────────────────────────

    /// Place an item in a location, moving it out of any other location.
    ///
    /// Returns `false` when either node does not exist.
    pub async fn link_item_to_location(
        &self,
        item_name: &str,
        location_name: &str,
    ) -> Result<bool, GraphError> {
        self.link(RelationKind::LocatedIn, item_name, location_name)
            .await
    }

    /// Assign an item to a category.
    pub async fn link_item_to_category(
        &self,
        item_name: &str,
        category_name: &str,
    ) -> Result<bool, GraphError> {
        self.link(RelationKind::BelongsTo, item_name, category_name)
            .await
    }

    /// Record who owns an item.
    pub async fn link_item_to_owner(
        &self,
        item_name: &str,
        person_name: &str,
    ) -> Result<bool, GraphError> {
        self.link(RelationKind::OwnedBy, item_name, person_name)
            .await
    }

    async fn link(
        &self,
        relation: RelationKind,
        source_name: &str,
        target_name: &str,
    ) -> Result<bool, GraphError> {
        let rows = self
            .store()
            .execute(link_statement(relation, source_name, target_name))
            .await?;
        let linked = !rows.is_empty();

        tracing::debug!(
            relation = relation.cypher(),
            source = source_name,
            target = target_name,
            linked,
            "Linked nodes"
        );
        Ok(linked)
    }
}

// ── Statements ───────────────────────────────────────────────────

fn lookup<'a>(values: &'a [(&str, Value)], name: &str) -> Option<&'a Value> {
    values.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
}

/// CREATE statement binding every property in the kind's shape.
/// Properties without a supplied value are bound as explicit nulls.
fn create_statement(kind: NodeKind, values: &[(&str, Value)]) -> Statement {
    let assignments = kind
        .properties()
        .iter()
        .map(|p| format!("{0}: ${0}", p.name))
        .collect::<Vec<_>>()
        .join(", ");
    let cypher = format!(
        "CREATE (n:{label} {{{assignments}}})
         RETURN properties(n) AS node",
        label = kind.label()
    );

    kind.properties().iter().fold(
        Statement::new(cypher).returns(&["node"]),
        |stmt, p| stmt.param(p.name, lookup(values, p.name).cloned().unwrap_or(Value::Null)),
    )
}

/// MATCH both endpoints and MERGE the edge in one statement.
///
/// For exclusive relations the source's edges to other targets are deleted
/// in the same statement.
fn link_statement(relation: RelationKind, source_name: &str, target_name: &str) -> Statement {
    let source = relation.source().label();
    let target = relation.target().label();
    let rel_type = relation.cypher();

    let detach = if relation.is_exclusive() {
        format!(
            "OPTIONAL MATCH (a)-[old:{rel_type}]->(other:{target})
             WHERE other <> b
             DELETE old
             WITH DISTINCT a, b
             "
        )
    } else {
        String::new()
    };

    let cypher = format!(
        "MATCH (a:{source} {{name: $source_name}})
         MATCH (b:{target} {{name: $target_name}})
         {detach}MERGE (a)-[:{rel_type}]->(b)
         RETURN a.name AS source, b.name AS target"
    );

    Statement::new(cypher)
        .param("source_name", source_name)
        .param("target_name", target_name)
        .returns(&["source", "target"])
}
