//! External service clients for Vocalis.
//!
//! [`ReasoningClient`] implements `vocalis_core::Provider` for the optional
//! reasoning service. [`ElevenLabsSynthesizer`] implements
//! `vocalis_core::SpeechSynthesizer`.

pub mod reasoning;
pub mod speech;

#[cfg(test)]
pub(crate) mod test_server;

pub use reasoning::ReasoningClient;
pub use speech::ElevenLabsSynthesizer;
