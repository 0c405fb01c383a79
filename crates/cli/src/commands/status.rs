//! `vocalis status`: Show system status.

use vocalis_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("Vocalis Status");
    println!("==============");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);
    match &config.reasoning.api_url {
        Some(url) if config.reasoning.is_configured() => {
            println!("  Reasoning:    {url}");
            println!(
                "  Model:        {}",
                config.reasoning.model.as_deref().unwrap_or("(service default)")
            );
        }
        _ => println!("  Reasoning:    not configured (local context replies)"),
    }
    println!(
        "  Speech:       {}",
        if config.speech.is_configured() { "ElevenLabs" } else { "disabled" }
    );
    println!("  Top-k:        {}", config.retrieval.top_k);
    println!("  History:      {} turns", config.retrieval.history_window);

    // Check config file existence
    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  Config file found");
    } else {
        println!("\n  No config file, using defaults and environment");
    }

    Ok(())
}
