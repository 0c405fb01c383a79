//! Context assembly for both answer paths.
//!
//! | Section | Fallback string | Reasoning messages |
//! |---------|-----------------|--------------------|
//! | Persona | system prompt | system message |
//! | Instruction | none | system message |
//! | Knowledge | `Context:` block | system message, always |
//! | History | last N turns | every turn, roles kept |
//! | Message | `User message:` line | final user message |

pub mod assembler;

pub use assembler::{CONTEXT_INSTRUCTION, ContextAssembler, DEFAULT_HISTORY_WINDOW};
