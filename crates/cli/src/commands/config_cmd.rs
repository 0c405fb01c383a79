//! `vocalis config`: Configuration management commands.

use vocalis_config::AppConfig;

const REDACTED: &str = "[REDACTED]";

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   Config parsed successfully");

            let mut warnings = Vec::new();

            if !config.reasoning.is_configured() {
                warnings.push("No reasoning service (set LLM_API_URL); replies use local context");
            }

            if config.reasoning.is_configured() && config.reasoning.api_key.is_none() {
                warnings.push("Reasoning service has no API key; requests are sent unauthenticated");
            }

            if config.speech.is_configured() && config.speech.default_voice_id.is_none() {
                warnings.push("No default voice; agents without a voice id get no audio");
            }

            if config.gateway.host == "0.0.0.0" {
                warnings.push("Gateway bound to 0.0.0.0 with no authentication in front of it");
            }

            if warnings.is_empty() {
                println!("   All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   warning: {w}");
                }
            }

            println!();
            println!(
                "   Gateway:   {}:{}",
                config.gateway.host, config.gateway.port
            );
            println!("   Top-k:     {}", config.retrieval.top_k);
        }
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&redacted(config))?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::default_toml());
    Ok(())
}

/// Mask secrets before printing a config.
fn redacted(mut config: AppConfig) -> AppConfig {
    if config.reasoning.api_key.is_some() {
        config.reasoning.api_key = Some(REDACTED.into());
    }
    if config.speech.api_key.is_some() {
        config.speech.api_key = Some(REDACTED.into());
    }
    config
}
