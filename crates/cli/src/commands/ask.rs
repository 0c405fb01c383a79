//! `vocalis ask`: One question against a throwaway agent.
//!
//! Builds an agent from the command-line flags, indexes the knowledge file
//! if one is given, and runs a single chat turn through the same service
//! the gateway uses.

use std::path::PathBuf;

use clap::Args;
use tracing::debug;
use vocalis_agent::{AgentService, ChatOutcome};
use vocalis_config::AppConfig;
use vocalis_core::agent::AgentDraft;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to ask
    #[arg(short, long)]
    pub message: String,

    /// Plain-text knowledge file; paragraphs separated by blank lines
    #[arg(short, long)]
    pub knowledge_file: Option<PathBuf>,

    /// Persona prompt for the agent
    #[arg(short, long)]
    pub system_prompt: Option<String>,

    /// Agent display name
    #[arg(short, long, default_value = "Assistant")]
    pub name: String,

    /// Voice id for speech synthesis
    #[arg(long)]
    pub voice: Option<String>,

    /// Write synthesized audio here when speech is configured
    #[arg(long)]
    pub audio_out: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: AskArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let service = AgentService::from_config(&config)?;

    let knowledge = match &args.knowledge_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
            debug!(path = %path.display(), bytes = text.len(), "Knowledge file loaded");
            Some(text)
        }
        None => None,
    };

    let outcome = ask(&service, &args, knowledge).await?;

    if args.json {
        let value = serde_json::json!({
            "reply": outcome.reply,
            "sources": outcome.sources,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", outcome.reply);
        if !outcome.sources.is_empty() {
            println!();
            println!("Sources:");
            for (i, source) in outcome.sources.iter().enumerate() {
                println!("  [{}] {}", i + 1, source);
            }
        }
    }

    match (&args.audio_out, &outcome.audio) {
        (Some(path), Some(audio)) => {
            std::fs::write(path, audio)?;
            eprintln!("Audio written to {} ({} bytes)", path.display(), audio.len());
        }
        (Some(path), None) => {
            tracing::warn!(path = %path.display(), "No audio produced, nothing written");
        }
        _ => {}
    }

    Ok(())
}

/// Register an agent from `args` and run one chat turn against it.
pub async fn ask(
    service: &AgentService,
    args: &AskArgs,
    knowledge: Option<String>,
) -> vocalis_core::Result<ChatOutcome> {
    let mut draft = AgentDraft::named(args.name.clone());
    draft.system_prompt = args.system_prompt.clone();
    draft.voice_id = args.voice.clone();
    draft.knowledge_base = knowledge;

    let agent = service.save_agent(draft).await?;
    service.chat(&agent.id, &args.message, &[]).await
}
