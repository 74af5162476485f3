use std::collections::BTreeMap;

use super::{Config, ConfigSource};

fn stable_source_label(source: &ConfigSource) -> &'static str {
    match source {
        ConfigSource::Cli => "cli",
        ConfigSource::Config => "config",
        ConfigSource::Programmatic => "programmatic",
        ConfigSource::Default => "default",
    }
}

impl Config {
    /// Effective configuration as `section.key -> (value, source)`.
    ///
    /// Sorted by key so the `config` subcommand output is stable.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add = |key: &str, value: String| {
            let source = stable_source_label(&self.source_of(key)).to_string();
            config.insert(key.to_string(), (value, source));
        };

        add("defaults.verbose", self.defaults.verbose.to_string());

        let selection = &self.selection;
        add("selection.max_file_bytes", selection.max_file_bytes.to_string());
        add("selection.max_total_bytes", selection.max_total_bytes.to_string());
        add("selection.source_dir_limit", selection.source_dir_limit.to_string());
        add("selection.fallback_threshold", selection.fallback_threshold.to_string());
        add("selection.fallback_limit", selection.fallback_limit.to_string());
        add("selection.fallback_max_depth", selection.fallback_max_depth.to_string());
        add("selection.source_dirs", selection.source_dirs.join(", "));
        add("selection.truncation_marker", format!("{:?}", selection.truncation_marker));

        add("chunking.max_tokens", self.chunking.max_tokens.to_string());
        add("chunking.chars_per_token", self.chunking.chars_per_token.to_string());

        add("source.max_depth", self.source.max_depth.to_string());
        add("source.max_file_bytes", self.source.max_file_bytes.to_string());
        add("source.skip_dirs", self.source.skip_dirs.join(", "));
        add("source.exclude", self.source.exclude.join(", "));

        add("llm.provider", self.llm.provider().to_string());
        if let Some(model) = &self.llm.model {
            add("llm.model", model.clone());
        }
        add("llm.api_key_env", self.llm.api_key_env().to_string());
        add("llm.timeout_secs", self.llm.timeout().as_secs().to_string());

        config
    }
}
