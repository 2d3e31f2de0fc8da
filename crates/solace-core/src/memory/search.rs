//! Similarity search over a context's chunk store.
//!
//! Two ranking paths: cosine similarity over lazily computed embeddings
//! when a backend is reachable, token-overlap keyword scoring otherwise.
//! A search never fails -- any embedding trouble silently degrades to the
//! keyword path.

use std::collections::HashSet;
use std::time::Duration;

use solace_types::memory::MemoryChunk;

use crate::backend::box_backend::BoxModelBackend;

use super::chunks::{QUERY_CHAR_CAP, normalize_chunk};

/// Bounded wait for one embedding batch.
const EMBED_TIMEOUT: Duration = Duration::from_secs(30);

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for empty inputs, mismatched dimensions, or a zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|y| y * y).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|tok| !tok.is_empty())
        .map(str::to_string)
        .collect()
}

/// Search a context's chunks for the passages most relevant to `query`.
///
/// With a backend present, chunks are ranked by embedding cosine
/// similarity; embeddings are computed lazily and cached write-once per
/// chunk. Without a backend, or when any embedding call fails, ranking
/// degrades to keyword overlap. A non-empty store always yields at least
/// one result for a non-empty query.
pub async fn search_chunks(
    backend: Option<&BoxModelBackend>,
    chunks: &mut [MemoryChunk],
    query: &str,
    top_k: usize,
) -> Vec<String> {
    let Some(clean_query) = normalize_chunk(query, QUERY_CHAR_CAP) else {
        return Vec::new();
    };
    if chunks.is_empty() {
        return Vec::new();
    }

    if let Some(backend) = backend {
        if let Some(ranked) = embedding_rank(backend, chunks, &clean_query, top_k).await {
            return ranked;
        }
    }

    keyword_search(chunks, &clean_query, top_k)
}

/// Rank chunks by token overlap with the query.
///
/// Score = number of shared distinct tokens, plus 1.0 when the raw query
/// is a literal substring of the chunk. Ties keep insertion order. When
/// every score is zero (or the query has no tokens), the first `top_k`
/// chunks are returned in insertion order rather than nothing.
pub fn keyword_search(chunks: &[MemoryChunk], query: &str, top_k: usize) -> Vec<String> {
    let q_tokens = tokenize(query);
    if q_tokens.is_empty() {
        return chunks.iter().take(top_k).map(|c| c.text.clone()).collect();
    }
    let q_set: HashSet<&str> = q_tokens.iter().map(String::as_str).collect();
    let query_lower = query.to_lowercase();

    let mut scored: Vec<(f32, &str)> = Vec::new();
    for chunk in chunks {
        if chunk.text.is_empty() {
            continue;
        }
        let tokens: HashSet<String> = tokenize(&chunk.text).into_iter().collect();
        if tokens.is_empty() {
            continue;
        }
        let overlap = q_set.iter().filter(|tok| tokens.contains(**tok)).count() as f32;
        let bonus = if chunk.text.to_lowercase().contains(&query_lower) {
            1.0
        } else {
            0.0
        };
        scored.push((overlap + bonus, chunk.text.as_str()));
    }
    if scored.is_empty() {
        return chunks.iter().take(top_k).map(|c| c.text.clone()).collect();
    }
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored
        .into_iter()
        .take(top_k)
        .map(|(_, text)| text.to_string())
        .collect()
}

/// Embedding-ranked search. Returns `None` whenever the keyword path
/// should take over: query embedding failed, or no chunk ended up with a
/// usable embedding of matching dimension.
async fn embedding_rank(
    backend: &BoxModelBackend,
    chunks: &mut [MemoryChunk],
    query: &str,
    top_k: usize,
) -> Option<Vec<String>> {
    let query_batch = vec![query.to_string()];
    let q_vec = match embed_with_timeout(backend, &query_batch).await {
        Some(mut vectors) if !vectors.is_empty() => vectors.remove(0),
        _ => return None,
    };

    let missing: Vec<usize> = chunks
        .iter()
        .enumerate()
        .filter(|(_, c)| c.embedding.is_none())
        .map(|(i, _)| i)
        .collect();
    if !missing.is_empty() {
        let texts: Vec<String> = missing.iter().map(|&i| chunks[i].text.clone()).collect();
        if let Some(vectors) = embed_with_timeout(backend, &texts).await {
            for (&idx, vector) in missing.iter().zip(vectors) {
                chunks[idx].embedding = Some(vector);
            }
        }
    }

    let mut scored: Vec<(f32, &str)> = Vec::new();
    for chunk in chunks.iter() {
        let Some(embedding) = chunk.embedding.as_ref() else {
            continue;
        };
        // Mismatched dimensions never enter the cosine ranking.
        if embedding.len() != q_vec.len() {
            continue;
        }
        scored.push((cosine_similarity(&q_vec, embedding), chunk.text.as_str()));
    }
    if scored.is_empty() {
        return None;
    }
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    Some(
        scored
            .into_iter()
            .take(top_k)
            .map(|(_, text)| text.to_string())
            .collect(),
    )
}

async fn embed_with_timeout(backend: &BoxModelBackend, texts: &[String]) -> Option<Vec<Vec<f32>>> {
    match tokio::time::timeout(EMBED_TIMEOUT, backend.embed(texts)).await {
        Ok(Ok(vectors)) => Some(vectors),
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "embedding call failed, degrading to keyword search");
            None
        }
        Err(_) => {
            tracing::warn!(
                timeout_s = EMBED_TIMEOUT.as_secs(),
                "embedding call timed out, degrading to keyword search"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::provider::ModelBackend;
    use solace_types::llm::{BackendError, CompletionRequest, CompletionResponse};
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // --- Mock backend ---

    struct MockEmbedBackend {
        vectors: HashMap<String, Vec<f32>>,
        embed_calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl MockEmbedBackend {
        fn new(pairs: &[(&str, Vec<f32>)]) -> Self {
            Self {
                vectors: pairs
                    .iter()
                    .map(|(text, vec)| (text.to_string(), vec.clone()))
                    .collect(),
                embed_calls: Arc::new(AtomicUsize::new(0)),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                vectors: HashMap::new(),
                embed_calls: Arc::new(AtomicUsize::new(0)),
                fail: true,
            }
        }
    }

    impl ModelBackend for MockEmbedBackend {
        fn name(&self) -> &str {
            "mock"
        }

        fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> impl Future<Output = Result<CompletionResponse, BackendError>> + Send {
            async { Err(BackendError::Transport("not wired in this mock".to_string())) }
        }

        fn embed(
            &self,
            texts: &[String],
        ) -> impl Future<Output = Result<Vec<Vec<f32>>, BackendError>> + Send {
            self.embed_calls.fetch_add(1, Ordering::SeqCst);
            let result = if self.fail {
                Err(BackendError::Transport("embedding backend down".to_string()))
            } else {
                Ok(texts
                    .iter()
                    .map(|text| {
                        self.vectors
                            .get(text)
                            .cloned()
                            .unwrap_or_else(|| vec![0.0, 0.0, 1.0])
                    })
                    .collect())
            };
            async move { result }
        }

        fn transcribe(
            &self,
            _audio: Vec<u8>,
            _filename: &str,
        ) -> impl Future<Output = Result<String, BackendError>> + Send {
            async { Err(BackendError::Transport("not wired in this mock".to_string())) }
        }
    }

    fn store(texts: &[&str]) -> Vec<MemoryChunk> {
        texts.iter().map(|t| MemoryChunk::new(*t)).collect()
    }

    // --- Cosine ---

    #[test]
    fn test_cosine_symmetric() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![0.5, 0.1, 0.9];
        let ab = cosine_similarity(&a, &b);
        let ba = cosine_similarity(&b, &a);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_mismatched_dims_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_cosine_identical_is_one() {
        let v = vec![0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    // --- Keyword path ---

    #[test]
    fn test_keyword_beach_query_ranks_beach_chunk_first() {
        let chunks = store(&["I love the beach", "we cooked dinner together"]);
        let hits = keyword_search(&chunks, "beach", 6);
        assert_eq!(hits[0], "I love the beach");
    }

    #[test]
    fn test_keyword_zero_scores_return_insertion_order() {
        let chunks = store(&["alpha", "bravo", "charlie"]);
        let hits = keyword_search(&chunks, "zzz", 2);
        assert_eq!(hits, vec!["alpha", "bravo"]);
    }

    #[test]
    fn test_keyword_substring_bonus_breaks_overlap_tie() {
        let chunks = store(&["sunday market and morning trips", "the morning market smelled of bread"]);
        // Both share the tokens; only the second contains the raw phrase.
        let hits = keyword_search(&chunks, "morning market", 2);
        assert_eq!(hits[0], "the morning market smelled of bread");
    }

    #[tokio::test]
    async fn test_search_empty_query_returns_empty() {
        let mut chunks = store(&["something"]);
        let hits = search_chunks(None, &mut chunks, "   ", 6).await;
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_empty_store_returns_empty() {
        let mut chunks: Vec<MemoryChunk> = Vec::new();
        let hits = search_chunks(None, &mut chunks, "anything", 6).await;
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_nonempty_store_never_empty_and_capped() {
        let mut chunks = store(&["one", "two", "three", "four"]);
        let hits = search_chunks(None, &mut chunks, "completely unrelated words", 3).await;
        assert!(!hits.is_empty());
        assert!(hits.len() <= 3);
    }

    // --- Embedding path ---

    #[tokio::test]
    async fn test_embedding_ranking_and_lazy_cache() {
        let backend = BoxModelBackend::new(MockEmbedBackend::new(&[
            ("the beach at dusk", vec![1.0, 0.0, 0.0]),
            ("her garden roses", vec![0.0, 1.0, 0.0]),
            ("waves and salt air", vec![0.9, 0.1, 0.0]),
        ]));
        let mut chunks = store(&["the beach at dusk", "her garden roses", "waves and salt air"]);

        let hits = search_chunks(Some(&backend), &mut chunks, "the beach at dusk", 2).await;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0], "the beach at dusk");
        assert_eq!(hits[1], "waves and salt air");
        assert!(chunks.iter().all(|c| c.has_embedding()));
    }

    #[tokio::test]
    async fn test_cached_embeddings_not_recomputed() {
        let mock = MockEmbedBackend::new(&[
            ("first memory", vec![1.0, 0.0, 0.0]),
            ("second memory", vec![0.0, 1.0, 0.0]),
        ]);
        let calls = mock.embed_calls.clone();
        let backend = BoxModelBackend::new(mock);
        let mut chunks = store(&["first memory", "second memory"]);

        let first = search_chunks(Some(&backend), &mut chunks, "first memory", 6).await;
        // One call for the query, one for the missing chunk batch.
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let second = search_chunks(Some(&backend), &mut chunks, "first memory", 6).await;
        // Only the query is embedded the second time.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_embedding_failure_degrades_to_keyword() {
        let backend = BoxModelBackend::new(MockEmbedBackend::failing());
        let mut chunks = store(&["I love the beach", "quiet evenings at home"]);

        let hits = search_chunks(Some(&backend), &mut chunks, "beach", 6).await;
        assert_eq!(hits[0], "I love the beach");
        assert!(chunks.iter().all(|c| !c.has_embedding()));
    }

    #[tokio::test]
    async fn test_mismatched_dimensions_degrade_to_keyword() {
        let backend = BoxModelBackend::new(MockEmbedBackend::new(&[]));
        let mut chunks = store(&["I love the beach"]);
        // A stale two-dimensional vector against a three-dimensional query.
        chunks[0].embedding = Some(vec![1.0, 0.0]);

        let hits = search_chunks(Some(&backend), &mut chunks, "beach", 6).await;
        assert_eq!(hits, vec!["I love the beach"]);
    }
}
