//! Read operations for the inventory graph.
//!
//! Every query is read-only and returns node properties via `properties(n)`
//! so rows carry plain maps rather than driver node handles.

use homealog_core::{Category, Item, ItemDetails, Location, NodeKind, RelationKind};

use crate::client::{GraphError, GraphStore, Statement};
use crate::operations::{column_as, optional_string, rows_as, GraphOperations};

impl<S: GraphStore> GraphOperations<S> {
    // ── Items by Relation ────────────────────────────────────────

    /// All items located in the named location, ordered by name.
    /// Empty when the location has no items or does not exist.
    pub async fn find_items_in_location(&self, location_name: &str) -> Result<Vec<Item>, GraphError> {
        self.find_items_related(RelationKind::LocatedIn, location_name)
            .await
    }

    /// All items in the named category, ordered by name.
    pub async fn find_items_by_category(&self, category_name: &str) -> Result<Vec<Item>, GraphError> {
        self.find_items_related(RelationKind::BelongsTo, category_name)
            .await
    }

    async fn find_items_related(
        &self,
        relation: RelationKind,
        target_name: &str,
    ) -> Result<Vec<Item>, GraphError> {
        let cypher = format!(
            "MATCH (i:Item)-[:{rel_type}]->(:{target} {{name: $target_name}})
             RETURN properties(i) AS item
             ORDER BY i.name",
            rel_type = relation.cypher(),
            target = relation.target().label(),
        );
        let q = Statement::new(cypher)
            .param("target_name", target_name)
            .returns(&["item"]);

        let rows = self.store().execute(q).await?;
        rows_as(rows, "item")
    }

    // ── Item Details ─────────────────────────────────────────────

    /// Fetch an item and the names of its location, category, and owner.
    ///
    /// Each relation is looked up independently and is `None` when absent.
    /// Returns `None` when no item has that name.
    pub async fn get_item_details(&self, item_name: &str) -> Result<Option<ItemDetails>, GraphError> {
        let q = Statement::new(
            "MATCH (i:Item {name: $item_name})
             OPTIONAL MATCH (i)-[:LOCATED_IN]->(l:Location)
             WITH i, head(collect(l.name)) AS location
             OPTIONAL MATCH (i)-[:BELONGS_TO]->(c:Category)
             WITH i, location, head(collect(c.name)) AS category
             OPTIONAL MATCH (i)-[:OWNED_BY]->(p:Person)
             RETURN properties(i) AS item, location, category, head(collect(p.name)) AS owner",
        )
        .param("item_name", item_name)
        .returns(&["item", "location", "category", "owner"]);

        let rows = self.store().execute(q).await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };

        Ok(Some(ItemDetails {
            item: column_as(row, "item")?,
            location: optional_string(row, "location"),
            category: optional_string(row, "category"),
            owner: optional_string(row, "owner"),
        }))
    }

    // ── Listings ─────────────────────────────────────────────────

    /// Every location, ordered by name.
    pub async fn list_all_locations(&self) -> Result<Vec<Location>, GraphError> {
        let rows = self.store().execute(list_statement(NodeKind::Location)).await?;
        rows_as(rows, "node")
    }

    /// Every category, ordered by name.
    pub async fn list_all_categories(&self) -> Result<Vec<Category>, GraphError> {
        let rows = self.store().execute(list_statement(NodeKind::Category)).await?;
        rows_as(rows, "node")
    }
}

fn list_statement(kind: NodeKind) -> Statement {
    Statement::new(format!(
        "MATCH (n:{label})
         RETURN properties(n) AS node
         ORDER BY n.name",
        label = kind.label()
    ))
    .returns(&["node"])
}
