//! Configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration as long as the API key variable is set.
//!
//! ```toml
//! [openai]
//! text_model = "o4-mini"
//! image_model = "gpt-image-1"
//!
//! [image]
//! size = "1024x1024"
//! quality = "standard"
//! output_format = "png"
//!
//! [session]
//! request_timeout_secs = 30
//! min_summary_chars = 125
//! ```

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use storystrip_core::ImageOptions;
use storystrip_error::{ConfigError, StripError, StripResult};
use storystrip_models::{
    DEFAULT_MIN_SUMMARY_CHARS, OpenAIClient, OpenAIImageGenerator, OpenAIScriptGenerator,
};
use storystrip_pipeline::PanelOrchestrator;
use tracing::{debug, info, instrument};

/// File name looked up in the user's config directory.
pub const DEFAULT_CONFIG_FILE: &str = "storystrip.toml";

/// Top-level configuration.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct StripConfig {
    /// Text and image backend
    openai: OpenAIConfig,
    /// Options sent with every image request
    image: ImageOptions,
    /// Session limits
    session: SessionConfig,
}

/// OpenAI-compatible backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct OpenAIConfig {
    /// API base URL
    base_url: String,
    /// Chat model that writes panel scripts
    text_model: String,
    /// Image model that draws panels
    image_model: String,
    /// Reasoning effort for reasoning text models
    reasoning_effort: Option<String>,
    /// Environment variable holding the API key
    api_key_env: String,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            text_model: "o4-mini".to_string(),
            image_model: "gpt-image-1".to_string(),
            reasoning_effort: Some("medium".to_string()),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// Limits applied to a strip session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct SessionConfig {
    /// Upper bound on each text or image request, in seconds
    request_timeout_secs: u64,
    /// Summaries shorter than this are rejected
    min_summary_chars: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            min_summary_chars: DEFAULT_MIN_SUMMARY_CHARS,
        }
    }
}

impl SessionConfig {
    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl StripConfig {
    /// Creates a builder for StripConfig.
    pub fn builder() -> StripConfigBuilder {
        StripConfigBuilder::default()
    }

    /// Load configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> StripResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            StripError::from(ConfigError::new(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            )))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> StripResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            StripError::from(ConfigError::new(format!("Failed to parse config: {}", e)))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise `storystrip.toml` from the user's
    /// config directory if it exists, otherwise the defaults.
    ///
    /// A `.env` file in the working directory is loaded first.
    pub fn load(path: Option<&Path>) -> StripResult<Self> {
        let _ = dotenvy::dotenv();

        if let Some(path) = path {
            info!(path = %path.display(), "Loading configuration");
            return Self::from_file(path);
        }

        match Self::default_path().filter(|p| p.is_file()) {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration");
                Self::from_file(path)
            }
            None => {
                debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config dir>/storystrip/storystrip.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("storystrip").join(DEFAULT_CONFIG_FILE))
    }

    /// Reads the API key from the configured environment variable.
    pub fn api_key(&self) -> StripResult<String> {
        let name = &self.openai.api_key_env;
        match std::env::var(name) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::new(format!("Environment variable {} is not set", name)).into()),
        }
    }

    /// Builds a client for the configured backend.
    pub fn client(&self) -> StripResult<OpenAIClient> {
        OpenAIClient::with_base_url(self.api_key()?, &self.openai.base_url)
            .with_timeout(self.session.request_timeout())
    }

    /// Builds the text collaborator.
    pub fn script_generator(&self, client: OpenAIClient) -> StripResult<OpenAIScriptGenerator> {
        OpenAIScriptGenerator::builder()
            .client(client)
            .model(self.openai.text_model.clone())
            .reasoning_effort(self.openai.reasoning_effort.clone())
            .min_summary_chars(self.session.min_summary_chars)
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid text model settings: {}", e)).into())
    }

    /// Builds the image collaborator.
    pub fn image_generator(&self, client: OpenAIClient) -> OpenAIImageGenerator {
        OpenAIImageGenerator::new(client, self.openai.image_model.clone())
    }

    /// Builds an idle orchestrator wired to the configured backend.
    pub fn orchestrator(
        &self,
    ) -> StripResult<PanelOrchestrator<OpenAIScriptGenerator, OpenAIImageGenerator>> {
        let client = self.client()?;
        Ok(PanelOrchestrator::with_options(
            self.script_generator(client.clone())?,
            self.image_generator(client),
            self.image,
            self.session.request_timeout(),
        ))
    }

    fn validate(&self) -> StripResult<()> {
        if *self.image.output_compression() > 100 {
            return Err(ConfigError::new(format!(
                "image.output_compression must be at most 100, got {}",
                self.image.output_compression()
            ))
            .into());
        }
        if self.session.request_timeout_secs == 0 {
            return Err(ConfigError::new("session.request_timeout_secs must be positive").into());
        }
        if self.openai.api_key_env.trim().is_empty() {
            return Err(ConfigError::new("openai.api_key_env must name a variable").into());
        }
        Ok(())
    }
}
