#[cfg(feature = "mcp")]
mod tools;

#[cfg(feature = "mcp")]
use quickpact::config::load_config_12factor_optional;
#[cfg(feature = "mcp")]
use quickpact::observability::{init_logs, with_startup_logs};
#[cfg(feature = "mcp")]
use quickpact::service::AgreementService;
#[cfg(feature = "mcp")]
use quickpact::storage::AgreementStore;
#[cfg(feature = "mcp")]
use rmcp::{ServiceExt, service::ServerInitializeError, transport::stdio};
#[cfg(feature = "mcp")]
use tools::QuickPactMcpServer;

#[cfg(feature = "mcp")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("QUICKPACT_CONFIG").ok();
    // the configured subscriber is not installed yet while the file is read
    let config = with_startup_logs(|| load_config_12factor_optional(config_path.as_deref()))?;

    // Logs go to stderr or a file so stdout stays clean for MCP JSON-RPC.
    // The guard flushes the file writer on drop and must outlive the server.
    let _log_guard = init_logs(&config.log_config())?;

    tracing::info!("starting quickpact-mcp (MCP mode)");
    tracing::info!(
        has_my_number = config.my_number().is_ok(),
        min_terms_length = config.min_terms_length(),
        "QuickPact configuration"
    );

    let service = AgreementService::new(config, AgreementStore::new());
    let server = QuickPactMcpServer::new(service);

    let tool_names: Vec<String> = QuickPactMcpServer::tools()
        .iter()
        .map(|t| t.name.to_string())
        .collect();
    tracing::info!(tools = ?tool_names, "QuickPact MCP server ready, waiting for client connection on stdio");

    let (stdin, stdout) = stdio();
    let running = match server.serve((stdin, stdout)).await {
        Ok(running) => running,
        Err(ServerInitializeError::ConnectionClosed(stage)) => {
            tracing::info!(stage = %stage, "client closed stdio before the MCP handshake, shutting down");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("MCP client connected, serving requests");

    running.waiting().await?;

    tracing::info!("MCP server shutting down");
    Ok(())
}

#[cfg(not(feature = "mcp"))]
fn main() {
    eprintln!("quickpact-mcp built without mcp feature; enable with --features mcp");
}
