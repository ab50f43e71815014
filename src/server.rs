use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::*,
    schemars,
    tool, tool_handler, tool_router,
};
use serde_json::json;

use crate::lists::Ingredient;
use crate::service::ListService;

// Parameter structs for tools
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct IngredientParams {
    pub name: String,
    pub category: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub custom: bool,
}

fn default_quantity() -> f64 {
    1.0
}

impl From<IngredientParams> for Ingredient {
    fn from(params: IngredientParams) -> Self {
        Ingredient {
            name: params.name,
            category: params.category,
            quantity: params.quantity,
            unit: params.unit,
            is_custom: params.custom,
        }
    }
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ListNameParams {
    pub list: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RenameListParams {
    pub list: String,
    pub new_name: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ListIngredientParams {
    pub list: String,
    pub ingredient: IngredientParams,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct EditIngredientParams {
    pub list: String,
    pub old: IngredientParams,
    pub new: IngredientParams,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct MoveIngredientParams {
    pub from_list: String,
    pub to_list: String,
    pub ingredient: IngredientParams,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchListParams {
    pub list: String,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchCatalogParams {
    #[serde(default)]
    pub query: String,
}

fn json_success(value: serde_json::Value) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(&value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn json_failure(action: &str, details: impl Display) -> Result<CallToolResult, McpError> {
    let error = json!({
        "error": action,
        "details": details.to_string()
    });
    Ok(CallToolResult::error(vec![Content::text(error.to_string())]))
}

#[derive(Clone)]
pub struct IngredientListsServer {
    service: Arc<ListService>,
    tool_router: ToolRouter<IngredientListsServer>,
}

#[tool_router]
impl IngredientListsServer {
    pub fn new(service: Arc<ListService>) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Get all of the user's ingredient lists with their entries")]
    pub async fn get_lists(&self) -> Result<CallToolResult, McpError> {
        let lists = self.service.lists().await;
        json_success(json!({
            "lists": lists,
            "total_count": lists.len()
        }))
    }

    #[tool(description = "Get one ingredient list by name")]
    pub async fn get_list(
        &self,
        Parameters(params): Parameters<ListNameParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.service.list(&params.list).await {
            Some(list) => json_success(json!(list)),
            None => json_failure("Failed to get list", format!("List not found: {}", params.list)),
        }
    }

    #[tool(description = "Create a new, empty ingredient list")]
    pub async fn create_list(
        &self,
        Parameters(params): Parameters<ListNameParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.service.create_list(&params.list).await {
            Ok(()) => json_success(json!({ "created": params.list })),
            Err(e) => json_failure("Failed to create list", e),
        }
    }

    #[tool(description = "Delete an ingredient list and everything on it")]
    pub async fn delete_list(
        &self,
        Parameters(params): Parameters<ListNameParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.service.delete_list(&params.list).await {
            Ok(()) => json_success(json!({ "deleted": params.list })),
            Err(e) => json_failure("Failed to delete list", e),
        }
    }

    #[tool(description = "Rename an ingredient list")]
    pub async fn rename_list(
        &self,
        Parameters(params): Parameters<RenameListParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.service.rename_list(&params.list, &params.new_name).await {
            Ok(()) => json_success(json!({ "renamed": params.list, "to": params.new_name })),
            Err(e) => json_failure("Failed to rename list", e),
        }
    }

    #[tool(description = "Add an ingredient to a list, merging quantities with a matching entry")]
    pub async fn add_ingredient(
        &self,
        Parameters(params): Parameters<ListIngredientParams>,
    ) -> Result<CallToolResult, McpError> {
        let ingredient: Ingredient = params.ingredient.into();
        match self.service.add_ingredient(&params.list, ingredient).await {
            Ok(()) => json_success(json!({ "list": self.service.list(&params.list).await })),
            Err(e) => json_failure("Failed to add ingredient", e),
        }
    }

    #[tool(description = "Remove an ingredient from a list")]
    pub async fn remove_ingredient(
        &self,
        Parameters(params): Parameters<ListIngredientParams>,
    ) -> Result<CallToolResult, McpError> {
        let ingredient: Ingredient = params.ingredient.into();
        match self.service.remove_ingredient(&params.list, &ingredient).await {
            Ok(()) => json_success(json!({ "removed": ingredient.name, "list": params.list })),
            Err(e) => json_failure("Failed to remove ingredient", e),
        }
    }

    #[tool(description = "Change the quantity or unit of an ingredient on a list")]
    pub async fn edit_ingredient(
        &self,
        Parameters(params): Parameters<EditIngredientParams>,
    ) -> Result<CallToolResult, McpError> {
        let old: Ingredient = params.old.into();
        match self
            .service
            .edit_ingredient(&params.list, &old, params.new.into())
            .await
        {
            Ok(()) => json_success(json!({ "list": self.service.list(&params.list).await })),
            Err(e) => json_failure("Failed to edit ingredient", e),
        }
    }

    #[tool(description = "Move an ingredient from one list to another")]
    pub async fn move_ingredient(
        &self,
        Parameters(params): Parameters<MoveIngredientParams>,
    ) -> Result<CallToolResult, McpError> {
        let ingredient: Ingredient = params.ingredient.into();
        match self
            .service
            .move_ingredient(&params.from_list, &params.to_list, &ingredient)
            .await
        {
            Ok(()) => json_success(json!({
                "moved": ingredient.name,
                "from": params.from_list,
                "to": params.to_list
            })),
            Err(e) => json_failure("Failed to move ingredient", e),
        }
    }

    #[tool(description = "Search a list for ingredients whose name contains the query")]
    pub async fn search_list(
        &self,
        Parameters(params): Parameters<SearchListParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.service.search_list(&params.list, &params.query).await {
            Ok(found) => json_success(json!({
                "ingredients": found,
                "total_count": found.len()
            })),
            Err(e) => json_failure("Failed to search list", e),
        }
    }

    #[tool(description = "Search the ingredient catalog by name")]
    pub async fn search_catalog(
        &self,
        Parameters(params): Parameters<SearchCatalogParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.service.search_catalog(&params.query).await {
            Ok(items) => json_success(json!({
                "ingredients": items,
                "total_count": items.len()
            })),
            Err(e) => json_failure("Failed to search catalog", e),
        }
    }

    #[tool(description = "Get available measurement units")]
    pub async fn get_units(&self) -> Result<CallToolResult, McpError> {
        match self.service.units().await {
            Ok(units) => json_success(json!({ "units": units })),
            Err(e) => json_failure("Failed to get units", e),
        }
    }

    #[tool(description = "Remove a deleted custom ingredient from every list")]
    pub async fn purge_custom_ingredient(
        &self,
        Parameters(params): Parameters<IngredientParams>,
    ) -> Result<CallToolResult, McpError> {
        let template: Ingredient = params.into();
        match self.service.purge_custom_ingredient(&template).await {
            Ok(purged) => json_success(json!({ "purged_lists": purged })),
            Err(e) => json_failure("Failed to purge custom ingredient", e),
        }
    }
}

#[tool_handler]
impl ServerHandler for IngredientListsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some("This server manages a user's named ingredient lists (for example Grocery and Pantry). Available tools create, rename and delete lists; add, remove and edit ingredients (matching entries merge their quantities); move ingredients between lists; and search lists and the ingredient catalog.".to_string()),
        }
    }
}
