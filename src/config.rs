//! Runtime configuration shared by the CLI and the server.
//!
//! Every flag can also come from the environment, so the server can be
//! configured the same way under systemd or a container.

use crate::advisor::gemini::{GeminiClient, DEFAULT_MODEL};
use crate::advisor::{Advisor, AdvisorError, ResponseCache};
use crate::registry::{Registry, RegistryError};
use clap::Args;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Args)]
pub struct Settings {
    /// Gemini API key. `API_KEY` is accepted as well.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Gemini model id.
    #[arg(long, env = "SAFE_MEAL_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// JSON file replacing the built-in restaurant list.
    #[arg(long, env = "SAFE_MEAL_REGISTRY", global = true)]
    pub registry: Option<PathBuf>,

    /// Timeout for model calls, in seconds.
    #[arg(long, env = "SAFE_MEAL_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Do not read or write the response cache.
    #[arg(long, global = true)]
    pub no_cache: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            registry: None,
            timeout_secs: 30,
            no_cache: false,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("registry", &self.registry)
            .field("timeout_secs", &self.timeout_secs)
            .field("no_cache", &self.no_cache)
            .finish()
    }
}

impl Settings {
    fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// The configured registry file, or the built-in dataset.
    pub fn load_registry(&self) -> Result<Registry, RegistryError> {
        match &self.registry {
            Some(path) => Registry::load_from(path),
            None => Registry::builtin(),
        }
    }

    /// Gemini-backed advisor, with the on-disk cache unless disabled.
    pub fn build_advisor(&self) -> Result<Advisor, AdvisorError> {
        let key = self.resolved_api_key().ok_or(AdvisorError::MissingApiKey)?;
        let client = GeminiClient::new(key, self.model.clone(), Duration::from_secs(self.timeout_secs))?;
        tracing::debug!(model = client.model_name(), timeout_secs = self.timeout_secs, "advisor configured");
        let advisor = Advisor::new(Arc::new(client));
        Ok(if self.no_cache {
            advisor
        } else {
            advisor.with_cache(ResponseCache::load())
        })
    }
}
