//! Keyword retrieval over an agent's knowledge chunks.
//!
//! Pure-Rust implementations of:
//! - Tokenization into lowercase alphanumeric word sets
//! - Jaccard similarity between two token sets
//! - Stable top-k ranking of chunks against a query

use std::collections::HashSet;

use vocalis_core::error::StoreError;
use vocalis_core::store::{AgentStore, RetrievedChunk};

/// Chunks returned per query when the caller has no preference.
pub const DEFAULT_TOP_K: usize = 3;

/// Lowercase `text` and split it on runs of non-alphanumeric characters.
///
/// Alphanumeric is Unicode-aware: "café" stays one token rather than
/// splitting at the accent the way an ASCII `[a-z0-9]` class would.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Compute Jaccard similarity `|a ∩ b| / |a ∪ b|`.
///
/// Returns 0.0 when both sets are empty.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f32 / union as f32
}

/// Score every chunk against `query` and keep the best `limit`.
///
/// Ties keep the chunks' original order. Zero-score chunks are still
/// eligible, so a query with no overlap returns the first chunks.
pub fn rank(chunks: &[String], query: &str, limit: usize) -> Vec<RetrievedChunk> {
    let query_tokens = tokenize(query);

    let mut scored: Vec<RetrievedChunk> = chunks
        .iter()
        .map(|chunk| RetrievedChunk {
            score: jaccard(&tokenize(chunk), &query_tokens),
            text: chunk.clone(),
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(limit);
    scored
}

/// Retrieve the `limit` chunks of an agent's knowledge most similar to `query`.
///
/// An unknown agent, or one with no indexed chunks, yields an empty list.
pub async fn retrieve(
    store: &dyn AgentStore,
    agent_id: &str,
    query: &str,
    limit: usize,
) -> Result<Vec<RetrievedChunk>, StoreError> {
    let Some(chunks) = store.chunks(agent_id).await? else {
        tracing::debug!(agent_id, "Retrieval for unknown agent");
        return Ok(Vec::new());
    };

    let results = rank(&chunks, query, limit);
    tracing::debug!(
        agent_id,
        candidates = chunks.len(),
        returned = results.len(),
        "Retrieved knowledge chunks"
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryAgentStore;
    use vocalis_core::AgentDraft;

    fn set(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn tokenize_lowercases_and_splits() {
        let tokens = tokenize("Refunds take 5-7 days, OK?");
        assert_eq!(tokens, set(&["refunds", "take", "5", "7", "days", "ok"]));
    }

    #[test]
    fn tokenize_empty_and_punctuation_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("?!... --").is_empty());
    }

    #[test]
    fn tokenize_dedups() {
        assert_eq!(tokenize("cat Cat CAT"), set(&["cat"]));
    }

    #[test]
    fn jaccard_identical() {
        let a = set(&["a", "b"]);
        assert!((jaccard(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn jaccard_partial_overlap() {
        let a = set(&["a", "b"]);
        let b = set(&["b", "c"]);
        assert!((jaccard(&a, &b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn jaccard_empty_sets() {
        assert_eq!(jaccard(&HashSet::new(), &HashSet::new()), 0.0);
        assert_eq!(jaccard(&set(&["a"]), &HashSet::new()), 0.0);
    }

    #[test]
    fn rank_orders_by_similarity() {
        let chunks = vec!["the cat sat".to_string(), "dogs bark".to_string(), "cat".to_string()];
        let results = rank(&chunks, "cat", 2);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "cat");
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert_eq!(results[1].text, "the cat sat");
        assert!((results[1].score - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn tokenize_keeps_accented_words_whole() {
        assert_eq!(tokenize("Naïve CAFÉ-goers"), set(&["naïve", "café", "goers"]));
    }

    #[test]
    fn rank_prefers_exact_token_over_plural() {
        let chunks = vec![
            "the cat sat".to_string(),
            "the dog ran".to_string(),
            "cats and dogs".to_string(),
        ];
        let results = rank(&chunks, "cat", 3);

        assert_eq!(results[0].text, "the cat sat");
        assert!((results[0].score - 1.0 / 3.0).abs() < 1e-6);
        // "cats" is a different token from "cat".
        assert_eq!(results[1].text, "the dog ran");
        assert_eq!(results[1].score, 0.0);
        assert_eq!(results[2].text, "cats and dogs");
        assert_eq!(results[2].score, 0.0);
    }

    #[test]
    fn rank_without_overlap_returns_first_chunks() {
        let chunks = vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()];
        let results = rank(&chunks, "zeta", 2);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "alpha");
        assert_eq!(results[1].text, "beta");
        assert!(results.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn rank_ties_keep_original_order() {
        let chunks = vec![
            "one apple".to_string(),
            "two apple".to_string(),
            "three apple".to_string(),
        ];
        let results = rank(&chunks, "apple", 3);
        let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["one apple", "two apple", "three apple"]);
    }

    #[test]
    fn rank_respects_limit() {
        let chunks: Vec<String> = (0..10).map(|i| format!("chunk {i}")).collect();
        assert_eq!(rank(&chunks, "chunk", 3).len(), 3);
        assert_eq!(rank(&chunks[..2], "chunk", 3).len(), 2);
        assert!(rank(&chunks, "chunk", 0).is_empty());
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let chunks = vec!["a b c".to_string(), "".to_string(), "c d".to_string()];
        for r in rank(&chunks, "a c e", 10) {
            assert!((0.0..=1.0).contains(&r.score));
        }
    }

    #[tokio::test]
    async fn retrieve_unknown_agent_is_empty() {
        let store = InMemoryAgentStore::new();
        let results = retrieve(&store, "missing", "anything", 3).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn retrieve_without_knowledge_is_empty() {
        let store = InMemoryAgentStore::new();
        let agent = store.upsert(AgentDraft::named("Empty")).await.unwrap();
        let results = retrieve(&store, &agent.id, "refund", 3).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn retrieve_ranks_indexed_chunks() {
        let store = InMemoryAgentStore::new();
        let agent = store.upsert(AgentDraft::named("Support")).await.unwrap();
        store
            .index(
                &agent.id,
                "Refunds take 5 business days.\n\nShipping is free over $50.",
            )
            .await
            .unwrap();

        let results = retrieve(&store, &agent.id, "How long do refunds take?", 1)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "Refunds take 5 business days.");
        assert!(results[0].score > 0.0);
    }
}
