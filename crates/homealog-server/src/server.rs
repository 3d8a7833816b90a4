//! # Home-Alog MCP Server
//!
//! Implements `ServerHandler` with one MCP tool per inventory action plus the
//! read-only `graph://locations` and `graph://categories` resources. Tool
//! input schemas are derived from the request structs in `homealog-core`.

use std::sync::Arc;

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{
        AnnotateAble, CallToolResult, Content, Implementation, ListResourcesResult,
        PaginatedRequestParams, RawResource, ReadResourceRequestParams, ReadResourceResult,
        Resource, ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};

use homealog_core::requests::{
    CategoryQuery, ItemQuery, LinkItemToCategory, LinkItemToLocation, LinkItemToOwner,
    LocationQuery, NewCategory, NewItem, NewLocation, NewPerson,
};
use homealog_graph::{Action, ActionOutcome, GraphError, GraphOperations, GraphStore};

use crate::config::ServerConfig;
use crate::render::render;

pub const LOCATIONS_URI: &str = "graph://locations";
pub const CATEGORIES_URI: &str = "graph://categories";

// =============================================================================
// MCP SERVER
// =============================================================================

/// MCP server exposing the inventory graph operations as tools.
pub struct HomealogMcp<S> {
    ops: Arc<GraphOperations<S>>,
    name: String,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl<S> Clone for HomealogMcp<S> {
    fn clone(&self) -> Self {
        Self {
            ops: Arc::clone(&self.ops),
            name: self.name.clone(),
            tool_router: self.tool_router.clone(),
        }
    }
}

/// Ensure the uniqueness constraints exist before serving, when configured.
///
/// Any failure other than an already-existing rule aborts startup: serving
/// without the constraints would let duplicate names in.
pub async fn prepare_schema<S: GraphStore>(
    store: &S,
    config: &ServerConfig,
) -> Result<(), GraphError> {
    if !config.init_constraints {
        tracing::info!("Skipping schema setup (server.init_constraints = false)");
        return Ok(());
    }
    store.initialize_constraints().await
}

// =============================================================================
// TOOL IMPLEMENTATIONS
// =============================================================================

#[tool_router]
impl<S: GraphStore + 'static> HomealogMcp<S> {
    pub fn new(ops: GraphOperations<S>, name: impl Into<String>) -> Self {
        Self {
            ops: Arc::new(ops),
            name: name.into(),
            tool_router: Self::tool_router(),
        }
    }

    async fn run(&self, action: Action) -> Result<CallToolResult, McpError> {
        let name = action.name();
        tool_result(name, self.ops.dispatch(action).await)
    }

    #[tool(description = "Create a new item in the inventory")]
    async fn create_item(&self, params: Parameters<NewItem>) -> Result<CallToolResult, McpError> {
        self.run(Action::CreateItem(params.0)).await
    }

    #[tool(description = "Create a new location (room, shelf, box, etc.)")]
    async fn create_location(
        &self,
        params: Parameters<NewLocation>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Action::CreateLocation(params.0)).await
    }

    #[tool(description = "Create a new item category")]
    async fn create_category(
        &self,
        params: Parameters<NewCategory>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Action::CreateCategory(params.0)).await
    }

    #[tool(description = "Create a new person who can own items")]
    async fn create_person(
        &self,
        params: Parameters<NewPerson>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Action::CreatePerson(params.0)).await
    }

    #[tool(description = "Place an item in a location, moving it out of any previous location")]
    async fn link_item_to_location(
        &self,
        params: Parameters<LinkItemToLocation>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Action::LinkItemToLocation(params.0)).await
    }

    #[tool(description = "Assign an item to a category")]
    async fn link_item_to_category(
        &self,
        params: Parameters<LinkItemToCategory>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Action::LinkItemToCategory(params.0)).await
    }

    #[tool(description = "Record which person owns an item")]
    async fn link_item_to_owner(
        &self,
        params: Parameters<LinkItemToOwner>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Action::LinkItemToOwner(params.0)).await
    }

    #[tool(description = "Find all items in a specific location")]
    async fn find_items_in_location(
        &self,
        params: Parameters<LocationQuery>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Action::FindItemsInLocation(params.0)).await
    }

    #[tool(description = "Find all items in a specific category")]
    async fn find_items_by_category(
        &self,
        params: Parameters<CategoryQuery>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Action::FindItemsByCategory(params.0)).await
    }

    #[tool(description = "Get detailed information about an item")]
    async fn get_item_details(
        &self,
        params: Parameters<ItemQuery>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Action::GetItemDetails(params.0)).await
    }

    #[tool(description = "List all locations in the home")]
    async fn list_locations(&self) -> Result<CallToolResult, McpError> {
        self.run(Action::ListLocations).await
    }

    #[tool(description = "List all item categories")]
    async fn list_categories(&self) -> Result<CallToolResult, McpError> {
        self.run(Action::ListCategories).await
    }

    // ── Resources ────────────────────────────────────────────────

    /// The read-only listing resources.
    pub fn resources() -> Vec<Resource> {
        [
            (LOCATIONS_URI, "All Locations", "List of all locations in the home"),
            (CATEGORIES_URI, "All Categories", "List of all item categories"),
        ]
        .into_iter()
        .map(|(uri, name, description)| {
            let mut raw = RawResource::new(uri, name);
            raw.description = Some(description.to_string());
            raw.mime_type = Some("application/json".to_string());
            raw.no_annotation()
        })
        .collect()
    }

    /// Read a listing resource as pretty-printed JSON.
    pub async fn read_uri(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let result = match uri {
            LOCATIONS_URI => self.ops.list_all_locations().await.map(|locations| {
                ActionOutcome::Locations { locations }
            }),
            CATEGORIES_URI => self.ops.list_all_categories().await.map(|categories| {
                ActionOutcome::Categories { categories }
            }),
            other => {
                return Err(McpError::resource_not_found(
                    format!("Unknown resource: {other}"),
                    None,
                ))
            }
        };

        let outcome = result.map_err(|e| {
            tracing::warn!(uri, error = %e, "Resource read failed");
            McpError::internal_error(format!("Error: {e}"), None)
        })?;
        let text = render(&outcome).map_err(|e| McpError::internal_error(e.to_string(), None))?;

        let mut contents = ResourceContents::text(text, uri);
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some("application/json".to_string());
        }
        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }
}

/// Map a dispatch result onto an MCP tool response.
///
/// Rejected arguments become an invalid-params protocol error. Store
/// failures are reported to the client as a tool error result.
pub fn tool_result(
    action: &str,
    result: Result<ActionOutcome, GraphError>,
) -> Result<CallToolResult, McpError> {
    match result {
        Ok(outcome) => {
            let text = render(&outcome).map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
        Err(GraphError::Invalid(e)) => Err(McpError::invalid_params(e.to_string(), None)),
        Err(e) => {
            tracing::warn!(action, error = %e, "Tool call failed");
            Ok(CallToolResult::error(vec![Content::text(format!("Error: {e}"))]))
        }
    }
}

// =============================================================================
// SERVER HANDLER
// =============================================================================

#[tool_handler]
impl<S: GraphStore + 'static> ServerHandler for HomealogMcp<S> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Home inventory knowledge graph. Use tools to create items, locations, \
                 categories, and people, link items to where they are kept, what they \
                 are, and who owns them, and look items up. The graph://locations and \
                 graph://categories resources list what exists."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(Self::resources()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_uri(&request.uri).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homealog_core::{HomealogError, RelationKind};
    use homealog_graph::testing::ScriptedStore;
    use homealog_graph::GraphConfig;
    use rmcp::model::ErrorCode;
    use serde_json::json;

    fn mcp() -> HomealogMcp<ScriptedStore> {
        HomealogMcp::new(GraphOperations::new(ScriptedStore::new()), "home-alog")
    }

    fn text_of(result: &CallToolResult) -> String {
        serde_json::to_string(&result.content).unwrap()
    }

    #[test]
    fn outcome_becomes_success_text() {
        let result = tool_result(
            "get_item_details",
            Ok(ActionOutcome::ItemNotFound {
                name: "NoSuchItem".to_string(),
            }),
        )
        .unwrap();
        assert_ne!(result.is_error, Some(true));
        assert!(text_of(&result).contains("Item 'NoSuchItem' not found"));
    }

    #[test]
    fn failed_link_is_still_a_success_result() {
        let result = tool_result(
            "link_item_to_category",
            Ok(ActionOutcome::Link {
                relation: RelationKind::BelongsTo,
                source: "TV".to_string(),
                target: "Tools".to_string(),
                linked: false,
            }),
        )
        .unwrap();
        assert_ne!(result.is_error, Some(true));
        assert!(text_of(&result).contains("Failed to create link"));
    }

    #[test]
    fn validation_failure_is_invalid_params() {
        let err = tool_result(
            "create_item",
            Err(GraphError::Invalid(HomealogError::MissingField("name"))),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("name"));
    }

    #[test]
    fn store_failure_is_tool_error() {
        let result = tool_result(
            "create_item",
            Err(GraphError::ConstraintViolation("Node already exists".to_string())),
        )
        .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("Error: Constraint violation"));
    }

    #[test]
    fn server_info_advertises_tools_resources_and_name() {
        let mcp = HomealogMcp::new(GraphOperations::from_config(GraphConfig::default()), "home-alog");
        let info = mcp.get_info();
        assert_eq!(info.server_info.name, "home-alog");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert_eq!(HomealogMcp::<ScriptedStore>::tool_router().list_all().len(), 12);
    }

    // ── Tools end to end ─────────────────────────────────────────

    #[tokio::test]
    async fn create_item_tool_runs_one_statement() {
        let mcp = mcp();
        mcp.ops.store().push_rows(vec![json!({
            "node": {"name": "Samsung TV", "description": "", "value": 799.99, "quantity": 1, "notes": ""}
        })]);

        let mut req = NewItem::named("Samsung TV");
        req.value = Some(799.99);
        let result = mcp.create_item(Parameters(req)).await.unwrap();

        assert_ne!(result.is_error, Some(true));
        assert!(text_of(&result).contains("Created item:"));
        let statements = mcp.ops.store().statements();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].text().starts_with("CREATE (n:Item"));
    }

    #[tokio::test]
    async fn invalid_tool_arguments_never_reach_the_store() {
        let mcp = mcp();
        let mut req = NewItem::named("Samsung TV");
        req.purchase_date = Some("2024-2-9".to_string());

        let err = mcp.create_item(Parameters(req)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(mcp.ops.store().statements().is_empty());
    }

    #[tokio::test]
    async fn link_tool_reports_missing_endpoint() {
        let mcp = mcp();
        let result = mcp
            .link_item_to_location(Parameters(LinkItemToLocation {
                item_name: "Ghost Item".to_string(),
                location_name: "Living Room".to_string(),
            }))
            .await
            .unwrap();
        assert!(text_of(&result)
            .contains("Failed to create link. Check that both item and location exist."));
    }

    #[tokio::test]
    async fn store_outage_surfaces_as_tool_error() {
        let mcp = mcp();
        mcp.ops
            .store()
            .push_err(GraphError::Connection("connection refused".to_string()));
        let result = mcp.list_categories().await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("Error: Neo4j connection error"));
    }

    // ── Resources ────────────────────────────────────────────────

    #[test]
    fn lists_both_listing_resources() {
        let uris: Vec<String> = HomealogMcp::<ScriptedStore>::resources()
            .into_iter()
            .map(|r| r.raw.uri)
            .collect();
        assert_eq!(uris, [LOCATIONS_URI, CATEGORIES_URI]);
    }

    #[tokio::test]
    async fn locations_resource_is_json_listing() {
        let mcp = mcp();
        mcp.ops.store().push_rows(vec![
            json!({"node": {"name": "Garage", "type": "room", "description": ""}}),
            json!({"node": {"name": "Kitchen", "type": "room", "description": ""}}),
        ]);

        let result = mcp.read_uri(LOCATIONS_URI).await.unwrap();
        let ResourceContents::TextResourceContents { uri, text, .. } = &result.contents[0] else {
            panic!("expected text contents");
        };
        assert_eq!(uri, LOCATIONS_URI);
        let listed: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(listed[0]["name"], "Garage");
        assert_eq!(listed[1]["name"], "Kitchen");
        assert!(mcp.ops.store().last_statement().text().contains("MATCH (n:Location)"));
    }

    #[tokio::test]
    async fn categories_resource_reads_categories() {
        let mcp = mcp();
        mcp.ops
            .store()
            .push_rows(vec![json!({"node": {"name": "Electronics", "description": "Gadgets"}})]);

        let result = mcp.read_uri(CATEGORIES_URI).await.unwrap();
        let ResourceContents::TextResourceContents { text, .. } = &result.contents[0] else {
            panic!("expected text contents");
        };
        assert!(text.contains("\"Electronics\""));
        assert!(mcp.ops.store().last_statement().text().contains("MATCH (n:Category)"));
    }

    #[tokio::test]
    async fn unknown_resource_is_not_found() {
        let mcp = mcp();
        let err = mcp.read_uri("graph://people").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
        assert!(mcp.ops.store().statements().is_empty());
    }

    // ── Startup ──────────────────────────────────────────────────

    #[tokio::test]
    async fn schema_failure_aborts_startup() {
        let store = ScriptedStore::new();
        store.push_err(GraphError::Connection("connection refused".to_string()));

        let err = prepare_schema(&store, &ServerConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::Connection(_)));
    }

    #[tokio::test]
    async fn existing_constraints_do_not_abort_startup() {
        let store = ScriptedStore::new();
        store.push_err(GraphError::SchemaRuleExists("item_name".to_string()));

        prepare_schema(&store, &ServerConfig::default()).await.unwrap();
        assert_eq!(store.statements().len(), 4);
    }

    #[tokio::test]
    async fn schema_setup_can_be_disabled() {
        let store = ScriptedStore::new();
        let config = ServerConfig {
            init_constraints: false,
            ..ServerConfig::default()
        };
        prepare_schema(&store, &config).await.unwrap();
        assert!(store.statements().is_empty());
    }
}
