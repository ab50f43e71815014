//! # Ingredient Lists MCP Library
//!
//! Keeps a user's named ingredient lists ("Grocery", "Pantry", ...) and exposes
//! them to AI assistants through the Model Context Protocol.
//!
//! ## Modules
//!
//! - [`lists`] - Ingredients, lists and collections with their merge rules
//! - [`backend`] - The persistence capability and its in-memory implementation
//! - [`client`] - HTTP implementation of the backend
//! - [`transfer`] - Cross-list moves with compensation
//! - [`service`] - [`ListService`], the entry point for every operation
//! - [`server`] - MCP tools over the service
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use mcp_ingredient_lists::{Credential, InMemoryBackend, Ingredient, ListService};
//!
//! # async fn example() -> mcp_ingredient_lists::error::Result<()> {
//! let service = ListService::new(
//!     Arc::new(InMemoryBackend::with_sample_data()),
//!     Credential::anonymous(),
//! );
//! service.start().await?;
//!
//! service
//!     .add_ingredient("Grocery", Ingredient::new("Apple", "Fruit", 3.0, "count"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod lists;
pub mod server;
pub mod service;
pub mod transfer;

pub use backend::{Backend, InMemoryBackend};
pub use client::{Credential, HttpBackend};
pub use error::ListError;
pub use lists::{CatalogItem, Ingredient, IngredientList, ListCollection};
pub use server::IngredientListsServer;
pub use service::ListService;
pub use transfer::{CompensationPolicy, MoveOperation, MoveOutcome};
