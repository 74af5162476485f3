use globset::Glob;

use repoglance_utils::error::{ConfigError, RepoGlanceError};

use super::Config;

/// Providers the summarizer knows how to construct.
const KNOWN_PROVIDERS: &[&str] = &["anthropic", "none"];

fn invalid(key: &str, value: impl Into<String>) -> RepoGlanceError {
    RepoGlanceError::Config(ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    })
}

impl Config {
    /// Validate the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first offending value.
    pub fn validate(&self) -> Result<(), RepoGlanceError> {
        let selection = &self.selection;
        if selection.max_file_bytes == 0 {
            return Err(invalid("max_file_bytes", "must be greater than 0"));
        }
        if selection.max_total_bytes == 0 {
            return Err(invalid("max_total_bytes", "must be greater than 0"));
        }

        if self.chunking.max_tokens == 0 {
            return Err(invalid("max_tokens", "must be greater than 0"));
        }
        if self.chunking.chars_per_token == 0 {
            return Err(invalid("chars_per_token", "must be greater than 0"));
        }

        if self.source.max_file_bytes == 0 {
            return Err(invalid("source.max_file_bytes", "must be greater than 0"));
        }
        for pattern in &self.source.exclude {
            if let Err(e) = Glob::new(pattern) {
                return Err(invalid("exclude", format!("'{pattern}': {e}")));
            }
        }

        let provider = self.llm.provider();
        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(invalid(
                "provider",
                format!(
                    "'{provider}' is not supported (expected one of: {})",
                    KNOWN_PROVIDERS.join(", ")
                ),
            ));
        }
        if let Some(temperature) = self.llm.temperature
            && !(0.0..=1.0).contains(&temperature)
        {
            return Err(invalid("temperature", "must be between 0.0 and 1.0"));
        }
        if self.llm.timeout_secs == Some(0) {
            return Err(invalid("timeout_secs", "must be greater than 0"));
        }
        if self.llm.max_tokens == Some(0) {
            return Err(invalid("llm.max_tokens", "must be greater than 0"));
        }

        Ok(())
    }
}
