//! # Lists HTTP Client
//!
//! The networked [`Backend`](crate::backend::Backend): a `reqwest` client for the
//! remote catalog and lists API.
//!
//! ## Modules
//!
//! - [`auth`] - The user credential and its bearer header
//! - [`client`] - [`HttpBackend`], one method per backend capability
//! - [`types`] - Request and response bodies
//!
//! ## Quick Start
//!
//! ```no_run
//! use mcp_ingredient_lists::backend::Backend;
//! use mcp_ingredient_lists::client::{Credential, HttpBackend};
//! use mcp_ingredient_lists::config::BackendConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let backend = HttpBackend::new(BackendConfig::new("http://localhost:8080"))?;
//! let credential = Credential::new("cook", "access-token");
//!
//! let lists = backend.fetch_lists(&credential).await?;
//! println!("Found {} lists", lists.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
#[allow(clippy::module_inception)]
pub mod client;
pub mod types;

pub use auth::Credential;
pub use client::HttpBackend;
