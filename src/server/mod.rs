pub mod handlers;

use crate::{Result, config::Config, tools::ToolRegistry};
use axum::{Router, http::HeaderName, routing::get};
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub const MCP_PATH: &str = "/mcp";

/// Browser-based MCP clients need to read the session header.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static("mcp-session-id")])
}

/// Streamable HTTP MCP endpoint at `/mcp` plus a plain `/health` check.
pub fn router(tools: ToolRegistry) -> Router {
    let mcp = StreamableHttpService::new(
        move || Ok(tools.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    Router::new()
        .nest_service(MCP_PATH, mcp)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

pub async fn run(config: Config) -> Result<()> {
    let host = std::env::var("MCP_HOST").unwrap_or_else(|_| config.server.host.clone());
    let port = match std::env::var("MCP_PORT") {
        Ok(port) => port
            .parse()
            .map_err(|e| crate::Error::config(format!("Invalid MCP_PORT '{}': {}", port, e)))?,
        Err(_) => config.server.port,
    };

    let tools = ToolRegistry::from_config(config)?;
    info!("Registered {} tools", tools.tools().len());

    let app = router(tools);

    let addr = SocketAddr::new(host.parse()?, port);
    info!("Starting MCP server on http://{}{}", addr, MCP_PATH);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
