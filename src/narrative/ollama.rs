//! # Ollama Client
//!
//! Blocking HTTP client for a local Ollama server. The connection handshake
//! verifies the server is reachable and the configured model is installed,
//! then sends a one-token generation as a final liveness check. All failures
//! map to [`BarrowError::Narrative`] so the assembler can degrade to the
//! template describer.

use crate::{BarrowError, BarrowResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::traits::DescriptionSource;

/// Configuration for the Ollama connection.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server
    pub base_url: String,
    /// Model name; matched against installed models by base name
    /// (the part before `:`)
    pub model: String,
    /// Timeout for the handshake requests, in seconds
    pub connect_timeout_secs: u64,
    /// Timeout for description requests, in seconds
    pub request_timeout_secs: u64,
    /// Token cap for generated descriptions
    pub num_predict: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: crate::config::DEFAULT_OLLAMA_URL.to_string(),
            model: crate::config::DEFAULT_MODEL.to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
            num_predict: 100,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    #[serde(default)]
    name: String,
}

impl ModelTag {
    /// Model name without the tag suffix (`gemma2:2b` → `gemma2`).
    fn base_name(&self) -> &str {
        self.name.split(':').next().unwrap_or(&self.name)
    }
}

/// Description source backed by a local Ollama server.
pub struct OllamaClient {
    config: OllamaConfig,
    client: reqwest::blocking::Client,
}

impl OllamaClient {
    /// Connects to the server and verifies the configured model.
    ///
    /// The handshake lists installed models, checks the configured model is
    /// among them (by base name), and sends a one-token `Ping` generation.
    /// Any failure is returned as [`BarrowError::Narrative`]; callers are
    /// expected to degrade, not abort.
    pub fn connect(config: OllamaConfig) -> BarrowResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| BarrowError::Narrative(format!("HTTP client setup failed: {}", e)))?;

        let ollama = Self { config, client };
        ollama.verify_model()?;
        // One-token generation as the final liveness check.
        ollama.generate("Ping", 1)?;
        info!(
            "Ollama connected at {} (model {})",
            ollama.config.base_url, ollama.config.model
        );
        Ok(ollama)
    }

    fn verify_model(&self) -> BarrowResult<()> {
        let url = format!("{}/api/tags", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| BarrowError::Narrative(format!("Ollama server unreachable: {}", e)))?;
        if !response.status().is_success() {
            return Err(BarrowError::Narrative(format!(
                "Ollama model listing failed: status {}",
                response.status()
            )));
        }

        let tags: TagsResponse = response
            .json()
            .map_err(|e| BarrowError::Narrative(format!("Bad model listing: {}", e)))?;
        if tags.models.is_empty() {
            return Err(BarrowError::Narrative(
                "No models installed in Ollama".to_string(),
            ));
        }

        let available: Vec<&str> = tags.models.iter().map(|m| m.base_name()).collect();
        if !available.contains(&self.config.model.as_str()) {
            return Err(BarrowError::Narrative(format!(
                "Model '{}' not found. Available models: {}",
                self.config.model,
                available.join(", ")
            )));
        }
        Ok(())
    }

    fn generate(&self, prompt: &str, num_predict: u32) -> BarrowResult<String> {
        let url = format!("{}/api/generate", self.config.base_url);
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions { num_predict },
        };

        debug!("Ollama generate: {} tokens max", num_predict);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| BarrowError::Narrative(format!("Ollama request failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(BarrowError::Narrative(format!(
                "Ollama generation failed: status {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .map_err(|e| BarrowError::Narrative(format!("Bad generation response: {}", e)))?;
        Ok(body.response.trim().to_string())
    }

    fn build_prompt(tile_name: &str, themes: &[String], creatures: &[String]) -> String {
        format!(
            "Describe a tabletop dungeon encounter in the {} with {} themes. \
             Include these monsters: {}. \
             Write one vivid paragraph (~50 words) describing the room and the \
             creatures as they appear. Focus on atmosphere, senses, and monster \
             behavior. Do not list CR or XP, and do not add monsters. \
             No locations or narrative beyond this room.",
            tile_name,
            themes.join(", "),
            creatures.join(", ")
        )
    }
}

impl DescriptionSource for OllamaClient {
    fn describe(
        &self,
        tile_name: &str,
        themes: &[String],
        creatures: &[String],
    ) -> BarrowResult<String> {
        let prompt = Self::build_prompt(tile_name, themes, creatures);
        let text = self.generate(&prompt, self.config.num_predict)?;
        if text.is_empty() {
            return Err(BarrowError::Narrative(
                "Empty response from Ollama".to_string(),
            ));
        }
        Ok(text)
    }

    fn source_name(&self) -> &'static str {
        "ollama"
    }
}
