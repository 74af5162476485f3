use std::collections::HashMap;

use repoglance_utils::error::RepoGlanceError;

use super::{ChunkPolicy, Config, ConfigSource, Defaults, LlmConfig, SelectionPolicy, SourceSettings};

impl Config {
    /// Create a new `ConfigBuilder` for programmatic configuration.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for programmatic configuration of repoglance.
///
/// Constructs a [`Config`] without touching the filesystem or the
/// environment, which keeps embedding and tests deterministic.
///
/// # Example
///
/// ```rust
/// use repoglance_config::Config;
///
/// let config = Config::builder()
///     .max_total_bytes(16 * 1024)
///     .chunk_max_tokens(2_000)
///     .build()
///     .expect("valid config");
/// assert_eq!(config.selection.max_total_bytes, 16 * 1024);
/// ```
///
/// # Source Attribution
///
/// All values set via the builder are attributed to `ConfigSource::Programmatic`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    max_file_bytes: Option<usize>,
    max_total_bytes: Option<usize>,
    chunk_max_tokens: Option<usize>,
    chars_per_token: Option<usize>,
    source_dirs: Option<Vec<String>>,
    exclude: Vec<String>,
    verbose: Option<bool>,
    llm_provider: Option<String>,
    model: Option<String>,
}

impl ConfigBuilder {
    /// Create a new `ConfigBuilder` with no values set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-file cap in bytes. Default: 102400.
    #[must_use]
    pub fn max_file_bytes(mut self, bytes: usize) -> Self {
        self.max_file_bytes = Some(bytes);
        self
    }

    /// Aggregate selection cap in bytes. Default: 51200.
    #[must_use]
    pub fn max_total_bytes(mut self, bytes: usize) -> Self {
        self.max_total_bytes = Some(bytes);
        self
    }

    /// Token budget of one summarizer chunk. Default: 8000.
    #[must_use]
    pub fn chunk_max_tokens(mut self, tokens: usize) -> Self {
        self.chunk_max_tokens = Some(tokens);
        self
    }

    #[must_use]
    pub fn chars_per_token(mut self, chars: usize) -> Self {
        self.chars_per_token = Some(chars);
        self
    }

    /// Replace the important-directory list (highest priority first).
    #[must_use]
    pub fn source_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_dirs = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    /// Add a glob pattern the repository source skips.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Summarizer provider: `anthropic` or `none`.
    #[must_use]
    pub fn llm_provider(mut self, provider: impl Into<String>) -> Self {
        self.llm_provider = Some(provider.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Build the configuration and validate it.
    ///
    /// # Errors
    ///
    /// Returns `RepoGlanceError::Config` if any value fails validation.
    pub fn build(self) -> Result<Config, RepoGlanceError> {
        let mut source_attribution = HashMap::new();
        let mut mark = |key: &str| {
            source_attribution.insert(key.to_string(), ConfigSource::Programmatic);
        };

        let mut defaults = Defaults::default();
        let mut selection = SelectionPolicy::default();
        let mut chunking = ChunkPolicy::default();
        let mut source = SourceSettings::default();
        let mut llm = LlmConfig::default();

        if let Some(bytes) = self.max_file_bytes {
            selection.max_file_bytes = bytes;
            mark("selection.max_file_bytes");
        }
        if let Some(bytes) = self.max_total_bytes {
            selection.max_total_bytes = bytes;
            mark("selection.max_total_bytes");
        }
        if let Some(dirs) = self.source_dirs {
            selection.source_dirs = dirs;
            mark("selection.source_dirs");
        }
        if let Some(tokens) = self.chunk_max_tokens {
            chunking.max_tokens = tokens;
            mark("chunking.max_tokens");
        }
        if let Some(chars) = self.chars_per_token {
            chunking.chars_per_token = chars;
            mark("chunking.chars_per_token");
        }
        if !self.exclude.is_empty() {
            source.exclude = self.exclude;
            mark("source.exclude");
        }
        if let Some(verbose) = self.verbose {
            defaults.verbose = verbose;
            mark("defaults.verbose");
        }
        if let Some(provider) = self.llm_provider {
            llm.provider = Some(provider);
            mark("llm.provider");
        }
        if let Some(model) = self.model {
            llm.model = Some(model);
            mark("llm.model");
        }

        let config = Config {
            defaults,
            selection,
            chunking,
            source,
            llm,
            source_attribution,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_values_are_programmatic() {
        let config = Config::builder()
            .max_total_bytes(4_096)
            .chunk_max_tokens(500)
            .llm_provider("none")
            .build()
            .unwrap();

        assert_eq!(config.selection.max_total_bytes, 4_096);
        assert_eq!(config.chunking.ceiling_bytes(), 2_000);
        assert_eq!(
            config.source_of("selection.max_total_bytes"),
            ConfigSource::Programmatic
        );
        assert_eq!(
            config.source_of("selection.max_file_bytes"),
            ConfigSource::Default
        );
    }

    #[test]
    fn test_builder_validates() {
        assert!(Config::builder().max_file_bytes(0).build().is_err());
        assert!(Config::builder().llm_provider("mystery").build().is_err());
    }

    #[test]
    fn test_builder_source_dirs_and_excludes() {
        let config = Config::builder()
            .source_dirs(["app", "src"])
            .exclude("docs/**")
            .build()
            .unwrap();

        assert_eq!(config.selection.source_dirs, vec!["app", "src"]);
        assert_eq!(config.source.exclude, vec!["docs/**"]);
    }
}
