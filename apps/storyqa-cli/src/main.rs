use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use storyqa_answer::{AnswerPipeline, Engine, GeminiClient};
use storyqa_core::config::{expand_path, Config};
use storyqa_core::{AnswerResult, Chunk};
use storyqa_embed::get_default_vectorizer;
use storyqa_retrieve::{Embedder, EmbeddingCache};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EngineArg {
    /// Group story messages/events/paragraphs into fixed-size chunks
    Messages,
    /// Overlapping character windows over the raw file
    Text,
}

impl From<EngineArg> for Engine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Messages => Engine::Messages,
            EngineArg::Text => Engine::Text,
        }
    }
}

/// Ask questions about a story; answers are grounded in retrieved excerpts.
#[derive(Debug, Parser)]
#[command(name = "storyqa", version)]
struct Cli {
    /// Path to the story file (.xml or plain text)
    #[arg(long)]
    story: String,

    #[arg(long, value_enum, default_value = "messages")]
    engine: EngineArg,

    /// Answer a single question and exit
    #[arg(long)]
    q: Option<String>,

    /// Maximum number of evidence chunks (overrides retrieval.max_evidence)
    #[arg(long)]
    topk: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn render(result: &AnswerResult, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(result)?);
    }
    let ids: Vec<String> = result.evidence().iter().map(|e| e.chunk_id.to_string()).collect();
    let mut out = result.answer().to_string();
    if !ids.is_empty() { out.push_str(&format!("\n\nEvidence chunks: {}", ids.join(", "))); }
    if !result.is_answered() { out.push_str(&format!("\nWhy not: {}", result.why_not())); }
    Ok(out)
}

fn ask(pipeline: &AnswerPipeline, chunks: &[Chunk], question: &str, interactive: bool) -> AnswerResult {
    if !interactive { return pipeline.answer(question, chunks); }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
    spinner.set_message("Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = pipeline.answer(question, chunks);
    spinner.finish_and_clear();
    result
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let mut settings = config.settings()?;
    if let Some(k) = cli.topk { settings.retrieval.max_evidence = k; }
    settings.validate()?;

    let story: PathBuf = expand_path(&cli.story);
    let engine = Engine::from(cli.engine);
    let chunks = engine.chunks(&story, &settings)?;
    info!(story = %story.display(), ?engine, chunks = chunks.len(), "story loaded");

    let vectorizer = get_default_vectorizer(&settings.embed)?;
    let cache = Arc::new(EmbeddingCache::new(settings.cache.capacity)?);
    let embedder = Embedder::new(vectorizer, Arc::clone(&cache));
    let generator = Arc::new(GeminiClient::from_env(&settings.generator)?);
    let pipeline = AnswerPipeline::from_settings(&settings, embedder, generator);

    if let Some(question) = cli.q.as_deref() {
        println!("{}", render(&ask(&pipeline, &chunks, question, false), cli.json)?);
        return Ok(());
    }

    println!("Story QA. Ask me any question about the story (\"exit\" to quit)");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { println!("\nExiting."); break; };
        let question = line?;
        let question = question.trim();
        if question.eq_ignore_ascii_case("exit") { println!("Exiting."); break; }
        if question.is_empty() { continue; }
        println!("{}\n", render(&ask(&pipeline, &chunks, question, true), cli.json)?);
        let stats = cache.stats();
        tracing::debug!(hits = stats.hits, misses = stats.misses, evictions = stats.evictions, cached = cache.len(), "embedding cache");
    }
    Ok(())
}
