//! Context assembler: the persona prompt, retrieved knowledge, and recent
//! conversation rendered for one of the two answer paths.
//!
//! # Determinism
//!
//! Assembly is a pure function of its inputs. The fallback path returns the
//! assembled string as the reply, so identical inputs must always produce
//! identical replies.

use vocalis_core::agent::AgentProfile;
use vocalis_core::message::{ConversationTurn, Message};
use vocalis_core::store::RetrievedChunk;

/// Instruction sent ahead of the knowledge block on the reasoning path.
pub const CONTEXT_INSTRUCTION: &str = "Use the provided context snippets to answer accurately.";

/// Turns shown in the fallback "Recent conversation" section.
pub const DEFAULT_HISTORY_WINDOW: usize = 5;

const CHUNK_SEPARATOR: &str = "\n---\n";

/// Builds reply context from an agent, its retrieved knowledge, and the
/// caller-supplied conversation.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    history_window: usize,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl ContextAssembler {
    pub fn new(history_window: usize) -> Self {
        Self { history_window }
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    /// Render the local reply used when no reasoning service is configured.
    ///
    /// Non-empty sections, in order, joined by a blank line:
    /// the system prompt, a `Context:` block, a `Recent conversation:` block
    /// with the last `history_window` turns, and the `User message:` line.
    pub fn fallback_context(
        &self,
        agent: &AgentProfile,
        history: &[ConversationTurn],
        message: &str,
        chunks: &[RetrievedChunk],
    ) -> String {
        let mut sections: Vec<String> = Vec::with_capacity(4);

        if !agent.system_prompt.is_empty() {
            sections.push(agent.system_prompt.clone());
        }

        if !chunks.is_empty() {
            sections.push(knowledge_block(chunks));
        }

        let summary = self.summarize_history(history);
        if !summary.is_empty() {
            sections.push(format!("Recent conversation:\n{summary}"));
        }

        sections.push(format!("User message: {message}"));
        sections.join("\n\n")
    }

    /// Build the ordered message list for the reasoning service.
    ///
    /// The full history is forwarded; only the fallback string is windowed.
    pub fn reasoning_messages(
        &self,
        agent: &AgentProfile,
        history: &[ConversationTurn],
        message: &str,
        chunks: &[RetrievedChunk],
    ) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 4);
        messages.push(Message::system(agent.system_prompt.clone()));
        messages.push(Message::system(CONTEXT_INSTRUCTION));
        // Sent even when nothing was retrieved.
        messages.push(Message::system(knowledge_block(chunks)));
        messages.extend(history.iter().map(Message::from));
        messages.push(Message::user(message));
        messages
    }

    /// The last `history_window` turns as `ROLE: content` lines.
    fn summarize_history(&self, history: &[ConversationTurn]) -> String {
        let start = history.len().saturating_sub(self.history_window);
        history[start..]
            .iter()
            .map(|turn| format!("{}: {}", turn.role.as_str().to_uppercase(), turn.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn knowledge_block(chunks: &[RetrievedChunk]) -> String {
    let joined = chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR);
    format!("Context:\n{joined}")
}
