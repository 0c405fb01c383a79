//! Agent registry, knowledge indexing, and retrieval for Vocalis.

pub mod in_memory;
pub mod indexer;
pub mod retrieval;

pub use in_memory::InMemoryAgentStore;
pub use indexer::split_paragraphs;
pub use retrieval::{DEFAULT_TOP_K, jaccard, rank, retrieve, tokenize};
