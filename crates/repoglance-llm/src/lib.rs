//! Summarizer backend abstraction
//!
//! All providers implement [`LlmBackend`], so the analysis engine never
//! knows which provider it is talking to. [`from_config`] picks the backend
//! for a run; provider `none` means offline analysis and yields no backend.

mod anthropic_backend;
pub(crate) mod http_client;
mod retrying_backend;
mod types;

pub use retrying_backend::RetryingBackend;
pub use types::{LlmBackend, LlmInvocation, LlmResult, Message, Role};
pub use repoglance_utils::error::LlmError;

use anthropic_backend::AnthropicBackend;
use repoglance_config::Config;
use tracing::info;

/// Create the summarizer backend configured for this run.
///
/// Returns `Ok(None)` for provider `none`. HTTP providers are wrapped in a
/// [`RetryingBackend`] using the configured retry delay.
///
/// # Errors
///
/// Returns `LlmError::Unsupported` for an unknown provider and
/// `LlmError::Misconfiguration` when provider settings are incomplete.
pub fn from_config(config: &Config) -> Result<Option<Box<dyn LlmBackend>>, LlmError> {
    match config.llm.provider() {
        "none" => {
            info!("No summarizer provider configured, running offline");
            Ok(None)
        }
        "anthropic" => {
            let backend = AnthropicBackend::new_from_config(config)?;
            info!(provider = "anthropic", "Summarizer backend ready");
            Ok(Some(Box::new(RetryingBackend::new(
                Box::new(backend),
                config.llm.retry_delay(),
            ))))
        }
        unknown => Err(LlmError::Unsupported(format!(
            "Unknown LLM provider '{unknown}'. Supported providers: anthropic, none."
        ))),
    }
}
