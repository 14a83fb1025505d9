use anyhow::Result;
use chutes_mcp_rust::{config, logging, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Fills ${VAR} placeholders such as CHUTES_API_TOKEN
    dotenvy::dotenv().ok();

    // Logging depends on the config, so failures here go to stderr
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let _log_guards = match logging::init(&config.server.logs) {
        Ok(guards) => guards,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        level = %config.server.logs.level,
        file_logging = config.server.logs.file_enabled,
        "Starting Chutes MCP server"
    );

    server::run(config).await?;

    Ok(())
}
