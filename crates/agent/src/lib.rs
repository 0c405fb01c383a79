//! Turning a question into a grounded reply.
//!
//! For every chat turn the agent follows the same steps:
//!
//! 1. **Retrieve** the knowledge chunks most similar to the message
//! 2. **Assemble** context from the persona prompt, chunks, and history
//! 3. **Answer** through the reasoning service when one is configured,
//!    or return the assembled context itself when none is
//! 4. **Speak** the reply through the speech synthesizer, if attached
//!
//! Both answer paths report the same retrieved chunks as sources.

pub mod context;
pub mod reply;
pub mod service;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use context::{CONTEXT_INSTRUCTION, ContextAssembler, DEFAULT_HISTORY_WINDOW};
pub use reply::{GeneratedReply, ReplyGenerator};
pub use service::{AgentService, ChatOutcome};
