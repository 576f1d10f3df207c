//! Web server command.

use console::style;

use crate::config::Settings;
use crate::llm::{LlmConfig, LlmProvider};

/// Port used when the bind address names only a host.
const DEFAULT_PORT: u16 = 8000;

/// Whether upstream calls are enabled for a provider that requires a key
/// but none is configured.
fn needs_api_key(llm: &LlmConfig) -> bool {
    llm.enabled && llm.provider == LlmProvider::OpenAI && llm.api_key.is_none()
}

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind);

    settings.ensure_directories()?;

    println!("{} Preparing database...", style("→").cyan());
    let ctx = settings.create_db_context();
    if let Err(e) = ctx.init_schema().await {
        eprintln!("  {} Schema setup failed: {}", style("✗").red(), e);
        return Err(anyhow::anyhow!("Database setup failed: {}", e));
    }
    println!("  {} Database ready", style("✓").green());

    if needs_api_key(&settings.llm) {
        println!(
            "  {} No LLM API key configured; /chat and /ask will fail",
            style("!").yellow()
        );
    }

    println!(
        "{} Starting advisor server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "8000" -> 127.0.0.1:8000
/// - Just a host: "0.0.0.0" -> 0.0.0.0:8000
/// - Host and port: "0.0.0.0:8000" -> 0.0.0.0:8000
fn parse_bind_address(bind: &str) -> (String, u16) {
    if let Ok(port) = bind.parse::<u16>() {
        return ("127.0.0.1".to_string(), port);
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return (host.to_string(), port);
        }
    }

    (bind.to_string(), DEFAULT_PORT)
}
