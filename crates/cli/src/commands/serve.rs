//! `vocalis serve`: Start the HTTP API server.

use tracing::info;
use vocalis_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        info!(port, "Port overridden from the command line");
        config.gateway.port = port;
    }

    println!("Vocalis Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!(
        "   Replies:   {}",
        if config.reasoning.is_configured() { "reasoning service" } else { "local context" }
    );
    println!(
        "   Speech:    {}",
        if config.speech.is_configured() { "enabled" } else { "disabled" }
    );

    vocalis_gateway::start(config).await?;

    Ok(())
}
