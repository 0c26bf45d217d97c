use storyqa_core::config::EmbedSettings;
use storyqa_core::traits::Vectorizer;
use storyqa_embed::{get_default_vectorizer, resolve_model_dir, HashingVectorizer};

fn dot(a: &[f32], b: &[f32]) -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() }

#[test]
fn hashing_vectorizer_shapes_and_determinism() {
    let settings = EmbedSettings { use_fake: true, fake_dim: 128, ..EmbedSettings::default() };
    let vectorizer = get_default_vectorizer(&settings).expect("vectorizer");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = vectorizer.embed_batch(&texts).expect("embed_batch");

    assert_eq!(embs.len(), 2);
    assert_eq!(embs[0].len(), 128, "embedding dim follows settings");
    assert_eq!(vectorizer.dim(), 128);

    let norm: f32 = embs[0].iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");
    assert_eq!(embs[0], embs[1], "deterministic for same input");
}

#[test]
fn hashing_vectorizer_prefers_shared_words() {
    let v = HashingVectorizer::new(256);
    let q = v.embed_text("Who stole the lantern?");
    let near = v.embed_text("Mara stole the lantern from the lighthouse.");
    let far = v.embed_text("Breakfast was eggs and toast.");
    assert!(dot(&q, &near) > dot(&q, &far));
}

#[test]
fn hashing_vectorizer_empty_text_is_zero() {
    let v = HashingVectorizer::new(16);
    assert!(v.embed_text("   ").iter().all(|x| *x == 0.0));
}

#[test]
fn explicit_model_dir_wins() {
    let tmp = tempfile::tempdir().expect("tmp");
    assert_eq!(resolve_model_dir(Some(tmp.path())).expect("explicit dir"), tmp.path());
}
