//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults, `config.toml`, `config.<env>.toml`
//! and `APP_*` env vars (`APP_RETRIEVAL__GROUP_SIZE=5`). Provides a helper to
//! expand `~` and `${VAR}` in user-supplied paths.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::Error;
use crate::prompt::DEFAULT_MAX_PROMPT_CHARS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Units per chunk.
    pub group_size: usize,
    /// Upper bound on chunks sent as evidence.
    pub max_evidence: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self { Self { group_size: 3, max_evidence: 4 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for TextSettings {
    fn default() -> Self { Self { chunk_size: 900, overlap: 180 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    pub max_chars: usize,
}

impl Default for PromptSettings {
    fn default() -> Self { Self { max_chars: DEFAULT_MAX_PROMPT_CHARS } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self { Self { capacity: 4096 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedSettings {
    pub model_dir: Option<String>,
    pub use_fake: bool,
    pub fake_dim: usize,
    pub max_len: usize,
}

impl Default for EmbedSettings {
    fn default() -> Self { Self { model_dir: None, use_fake: false, fake_dim: 384, max_len: 256 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self { Self { model: "gemini-2.5-flash".to_string(), timeout_secs: 60 } }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub retrieval: RetrievalSettings,
    pub text: TextSettings,
    pub prompt: PromptSettings,
    pub cache: CacheSettings,
    pub embed: EmbedSettings,
    pub generator: GeneratorSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<(), Error> {
        let positive = [
            ("retrieval.group_size", self.retrieval.group_size),
            ("retrieval.max_evidence", self.retrieval.max_evidence),
            ("text.chunk_size", self.text.chunk_size),
            ("prompt.max_chars", self.prompt.max_chars),
            ("cache.capacity", self.cache.capacity),
            ("embed.fake_dim", self.embed.fake_dim),
            ("embed.max_len", self.embed.max_len),
        ];
        if let Some((key, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(Error::InvalidConfig(format!("'{}' must be at least 1", key)));
        }
        if self.text.overlap >= self.text.chunk_size {
            return Err(Error::InvalidConfig("'text.overlap' must be smaller than 'text.chunk_size'".to_string()));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    /// The full typed settings tree, validated.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
