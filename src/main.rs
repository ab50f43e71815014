use std::sync::Arc;

use mcp_ingredient_lists::backend::{Backend, InMemoryBackend};
use mcp_ingredient_lists::client::{Credential, HttpBackend};
use mcp_ingredient_lists::config::{BackendKind, Config};
use mcp_ingredient_lists::server::IngredientListsServer;
use mcp_ingredient_lists::service::ListService;
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let backend: Arc<dyn Backend> = match config.backend {
        BackendKind::Memory => {
            tracing::info!("Using in-memory backend with sample data");
            Arc::new(InMemoryBackend::with_sample_data())
        }
        BackendKind::Http => {
            tracing::info!("Using lists backend at {}", config.http.base_url);
            Arc::new(HttpBackend::new(config.http.clone())?)
        }
    };

    let credential = Credential::new(config.username.clone(), config.access_token.clone());
    if config.backend == BackendKind::Http && !credential.is_authenticated() {
        tracing::warn!("LISTS_ACCESS_TOKEN is not set; backend calls will be rejected");
    }

    let service = Arc::new(ListService::with_policy(
        backend,
        credential,
        config.compensation,
    ));

    tracing::info!("Loading lists for '{}'...", service.credential().username());
    if let Err(e) = service.start().await {
        tracing::error!("Failed to start list session: {}", e);
        tracing::error!("Please verify:");
        tracing::error!("  - LISTS_BACKEND_URL is correct: {}", config.http.base_url);
        tracing::error!("  - LISTS_ACCESS_TOKEN holds a valid access token");
        tracing::error!("  - The lists backend is running and accessible");
        std::process::exit(1);
    }

    // Create server configuration and start SSE server
    let sse_config = SseServerConfig {
        bind: config.bind_addr.parse()?,
        sse_path: "/sse".to_string(),
        post_path: "/message".to_string(),
        ct: tokio_util::sync::CancellationToken::new(),
        sse_keep_alive: None,
    };

    tracing::info!("Ingredient lists MCP server listening on {}", sse_config.bind);

    let sse_server = SseServer::serve_with_config(sse_config).await?;

    // Every session shares the one list service
    let ct = sse_server.with_service(move || IngredientListsServer::new(service.clone()));

    tracing::info!("Ingredient lists MCP server started successfully");

    // Wait for Ctrl+C
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    ct.cancel();

    Ok(())
}
