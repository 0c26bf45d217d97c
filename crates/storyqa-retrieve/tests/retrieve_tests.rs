use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use storyqa_core::traits::Vectorizer;
use storyqa_core::Chunk;
use storyqa_embed::HashingVectorizer;
use storyqa_retrieve::{cosine_similarity, rank, Embedder, EmbeddingCache};

/// Hashing vectorizer that records every batch it is asked for.
struct CountingVectorizer {
    inner: HashingVectorizer,
    calls: AtomicUsize,
    batches: Mutex<Vec<Vec<String>>>,
}

impl CountingVectorizer {
    fn new() -> Arc<Self> {
        Arc::new(Self { inner: HashingVectorizer::new(64), calls: AtomicUsize::new(0), batches: Mutex::new(Vec::new()) })
    }
    fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl Vectorizer for CountingVectorizer {
    fn dim(&self) -> usize { self.inner.dim() }
    fn max_len(&self) -> usize { self.inner.max_len() }
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().unwrap().push(texts.to_vec());
        self.inner.embed_batch(texts)
    }
}

/// Returns the same vector for every text.
struct ConstantVectorizer;

impl Vectorizer for ConstantVectorizer {
    fn dim(&self) -> usize { 3 }
    fn max_len(&self) -> usize { 16 }
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0, 2.0, 3.0]).collect())
    }
}

fn embedder_with(vectorizer: Arc<dyn Vectorizer>, capacity: usize) -> Embedder {
    Embedder::new(vectorizer, Arc::new(EmbeddingCache::new(capacity).expect("cache")))
}

fn chunk(id: usize, text: &str) -> Chunk {
    Chunk { chunk_id: id, unit_ids: vec![format!("m{}", id)], text: text.to_string() }
}

fn strings(xs: &[&str]) -> Vec<String> { xs.iter().map(|s| s.to_string()).collect() }

#[test]
fn embed_deduplicates_and_batches_misses() {
    let counting = CountingVectorizer::new();
    let embedder = embedder_with(counting.clone(), 16);

    let out = embedder.embed(&strings(&["a b", "c d", "a b"])).expect("embed");
    assert_eq!(out.len(), 3);
    assert_eq!(out[0], out[2]);
    assert_eq!(counting.calls(), 1);
    assert_eq!(counting.batches.lock().unwrap()[0], strings(&["a b", "c d"]));
}

#[test]
fn embed_is_idempotent_through_the_cache() {
    let counting = CountingVectorizer::new();
    let embedder = embedder_with(counting.clone(), 16);

    let first = embedder.embed(&strings(&["the lantern"])).expect("first");
    let second = embedder.embed(&strings(&["the lantern"])).expect("second");
    assert_eq!(first, second, "bit-identical vectors");
    assert_eq!(counting.calls(), 1, "second call is served from cache");

    // Mixed call only sends the new text.
    embedder.embed(&strings(&["the lantern", "the lighthouse"])).expect("mixed");
    assert_eq!(counting.batches.lock().unwrap()[1], strings(&["the lighthouse"]));
    assert_eq!(embedder.cache().stats().hits, 2);
}

#[test]
fn cache_keys_are_exact() {
    let counting = CountingVectorizer::new();
    let embedder = embedder_with(counting.clone(), 16);
    embedder.embed(&strings(&["Lantern"])).expect("one");
    embedder.embed(&strings(&["lantern", "Lantern "])).expect("two");
    assert_eq!(counting.batches.lock().unwrap()[1], strings(&["lantern", "Lantern "]));
}

#[test]
fn cache_evicts_least_recently_used() {
    let cache = EmbeddingCache::new(2).expect("cache");
    cache.put("a".into(), vec![1.0]);
    cache.put("b".into(), vec![2.0]);
    assert!(cache.get("a").is_some());
    cache.put("c".into(), vec![3.0]);

    assert_eq!(cache.len(), 2);
    assert!(cache.contains("a"));
    assert!(!cache.contains("b"), "b was least recently used");
    assert_eq!(cache.stats().evictions, 1);
    assert!(EmbeddingCache::new(0).is_err());
}

#[test]
fn embed_survives_batches_larger_than_capacity() {
    let counting = CountingVectorizer::new();
    let embedder = embedder_with(counting.clone(), 1);
    let out = embedder.embed(&strings(&["one", "two", "three"])).expect("embed");
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|v| v.len() == 64));
    assert_eq!(embedder.cache().len(), 1);
}

#[test]
fn cosine_similarity_edge_cases() {
    let v = [0.3f32, -1.2, 4.0];
    let scaled: Vec<f32> = v.iter().map(|x| x * 2.5).collect();
    assert!((cosine_similarity(&v, &scaled) - 1.0).abs() < 1e-6);
    assert_eq!(cosine_similarity(&[0.0, 0.0, 0.0], &v), 0.0);
    assert_eq!(cosine_similarity(&v, &[1.0, 2.0]), 0.0);
    assert_eq!(cosine_similarity(&[], &[]), 0.0);
    assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
}

#[test]
fn rank_empty_does_not_embed() {
    let counting = CountingVectorizer::new();
    let embedder = embedder_with(counting.clone(), 16);
    assert!(rank("anything?", &[], &embedder).expect("rank").is_empty());
    assert_eq!(counting.calls(), 0);
}

#[test]
fn rank_orders_by_similarity() {
    let counting = CountingVectorizer::new();
    let embedder = embedder_with(counting.clone(), 16);
    let chunks = vec![
        chunk(0, "breakfast was eggs and toast"),
        chunk(1, "mara stole the lantern from the lighthouse"),
        chunk(2, "the weather turned cold"),
    ];
    let ranked = rank("who stole the lantern", &chunks, &embedder).expect("rank");
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].chunk.chunk_id, 1);
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    assert_eq!(counting.calls(), 2, "question and chunks are embedded in separate calls");
}

#[test]
fn rank_is_stable_on_ties() {
    let embedder = embedder_with(Arc::new(ConstantVectorizer), 16);
    let chunks: Vec<Chunk> = (0..5).map(|i| chunk(i, &format!("text {}", i))).collect();
    let ranked = rank("q", &chunks, &embedder).expect("rank");
    let ids: Vec<usize> = ranked.iter().map(|r| r.chunk.chunk_id).collect();
    assert_eq!(ids, [0, 1, 2, 3, 4]);
}
