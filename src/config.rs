//! Provider configuration.
//!
//! Loaded once at process start and treated as immutable, read-only,
//! shared state afterwards. Credentials are held as [`SecretString`]
//! so they never appear in debug output or logs.

use secrecy::SecretString;

use crate::types::ModelSelector;

/// Generation parameters applied by every adapter.
///
/// The concrete knobs differ per provider shape (`generationConfig`
/// for Gemini, top-level fields for chat completions); the values are
/// tunable defaults, not a contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationDefaults {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 1000,
        }
    }
}

/// Configuration for one upstream provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the provider API
    pub base_url: String,
    /// Credential, absent when the provider is not provisioned
    pub api_key: Option<SecretString>,
    /// Model name as the provider catalogue knows it
    pub model: String,
    /// Publisher tag prefixing the wire model id (GitHub Models catalogue)
    pub publisher: Option<String>,
    /// Generation defaults for this provider
    pub generation: GenerationDefaults,
}

impl ProviderConfig {
    /// Create a configuration with the given endpoint and model
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            model: model.into(),
            publisher: None,
            generation: GenerationDefaults::default(),
        }
    }

    /// Set the credential
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Set the publisher tag
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    /// Set generation defaults
    pub fn with_generation(mut self, generation: GenerationDefaults) -> Self {
        self.generation = generation;
        self
    }

    /// Model id as it goes on the wire, publisher-prefixed when a
    /// publisher tag is set (e.g. `openai/gpt-4.1`).
    pub fn wire_model(&self) -> String {
        match &self.publisher {
            Some(publisher) => format!("{publisher}/{}", self.model),
            None => self.model.clone(),
        }
    }
}

/// Process-wide relay configuration: one entry per selector.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub gemini: ProviderConfig,
    pub deepseek: ProviderConfig,
    pub openai: ProviderConfig,
    /// Selector used when a request carries no `model` field
    pub default_model: ModelSelector,
    /// Upstream call timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            gemini: ProviderConfig::new(
                "https://generativelanguage.googleapis.com/v1beta",
                "gemini-2.0-flash",
            ),
            deepseek: ProviderConfig::new(
                "https://models.github.ai/inference",
                "deepseek/DeepSeek-R1",
            ),
            openai: ProviderConfig::new("https://models.github.ai/inference", "gpt-4.1")
                .with_publisher("openai"),
            default_model: ModelSelector::Gemini,
            request_timeout_secs: 30,
        }
    }
}

impl RelayConfig {
    /// Load configuration from the environment.
    ///
    /// Reads `GEMINI_API_KEY`, `GITHUB_TOKEN` (deepseek) and
    /// `GITHUB_TOKEN_2` (openai). An unset or empty variable leaves the
    /// provider without a credential; requests selecting it fail fast
    /// without a network call.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(key) = env_credential("GEMINI_API_KEY") {
            config.gemini = config.gemini.with_api_key(key);
        }
        if let Some(key) = env_credential("GITHUB_TOKEN") {
            config.deepseek = config.deepseek.with_api_key(key);
        }
        if let Some(key) = env_credential("GITHUB_TOKEN_2") {
            config.openai = config.openai.with_api_key(key);
        }
        config
    }

    /// Configuration entry for a selector.
    pub fn provider(&self, selector: ModelSelector) -> &ProviderConfig {
        match selector {
            ModelSelector::Gemini => &self.gemini,
            ModelSelector::Deepseek => &self.deepseek,
            ModelSelector::OpenAi => &self.openai,
        }
    }
}

fn env_credential(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
