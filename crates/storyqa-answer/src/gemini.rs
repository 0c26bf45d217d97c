use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use storyqa_core::config::GeneratorSettings;
use storyqa_core::traits::Generator;
use storyqa_core::Error;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Blocking client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self> {
        if api_key.is_empty() {
            return Err(anyhow!("GEMINI_API_KEY is not set"));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;
        Ok(Self { api_key, model, base_url: DEFAULT_BASE_URL.to_string(), client })
    }

    /// Key from `GEMINI_API_KEY` (a `.env` file is honoured), model from settings.
    pub fn from_env(settings: &GeneratorSettings) -> Result<Self> {
        dotenv::dotenv().ok();
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        Self::new(api_key, settings.model.clone(), Duration::from_secs(settings.timeout_secs))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model)
    }
}

impl Generator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let request = GeminiRequest { contents: vec![GeminiContent { parts: vec![GeminiPart { text: Some(prompt.to_string()) }] }] };
        info!(model = %self.model, "sending request to Gemini");
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .context("Gemini request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(anyhow!("Gemini request failed ({}): {}", status.as_u16(), body));
        }
        let parsed: GeminiResponse = response.json().context("Failed to parse Gemini response")?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(Error::EmptyResponse("Gemini".to_string()).into());
        }
        debug!(chars = text.chars().count(), "Gemini answered");
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}
