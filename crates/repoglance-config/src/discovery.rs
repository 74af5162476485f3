use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use repoglance_utils::error::ConfigError;

use super::{
    CONFIG_DIR, CONFIG_FILE, ChunkPolicy, CliArgs, Config, ConfigSource, Defaults, LlmConfig,
    SelectionPolicy, SourceSettings,
};

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TomlConfig {
    defaults: Defaults,
    selection: SelectionPolicy,
    chunking: ChunkPolicy,
    source: SourceSettings,
    llm: LlmConfig,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is provided in `cli_args`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if the
    /// resolved configuration fails validation.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = std::env::current_dir().map_err(|e| ConfigError::DiscoveryFailed {
            reason: format!("cannot read the current directory: {e}"),
        })?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory.
    ///
    /// This is the path-driven variant used by tests to avoid process-global state.
    ///
    /// # Errors
    ///
    /// See [`Config::discover`].
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        let config_path = match &cli_args.config_path {
            Some(explicit_path) => {
                if !explicit_path.is_file() {
                    return Err(ConfigError::NotFound {
                        path: explicit_path.display().to_string(),
                    }
                    .into());
                }
                Some(explicit_path.clone())
            }
            None => {
                if !start_dir.is_dir() {
                    return Err(ConfigError::DiscoveryFailed {
                        reason: format!("'{}' is not a directory", start_dir.display()),
                    }
                    .into());
                }
                Self::discover_config_file_from(start_dir)
            }
        };

        let mut config = match &config_path {
            Some(path) => Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_args);
        config.validate()?;

        debug!(
            config_file = ?config_path,
            overrides = config.source_attribution.len(),
            "Configuration resolved"
        );

        Ok(config)
    }

    /// Search upward from `start_dir` for `.repoglance/config.toml`.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        start_dir
            .ancestors()
            .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Parse a config file, attributing every key it sets to the file.
    fn load_config_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let table: toml::Table = toml::from_str(&raw)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {e}", path.display())))?;

        let mut source_attribution = HashMap::new();
        for (section, value) in &table {
            if let Some(keys) = value.as_table() {
                for key in keys.keys() {
                    source_attribution.insert(format!("{section}.{key}"), ConfigSource::Config);
                }
            }
        }

        let file: TomlConfig = toml::Value::Table(table)
            .try_into()
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {e}", path.display())))?;

        Ok(Self {
            defaults: file.defaults,
            selection: file.selection,
            chunking: file.chunking,
            source: file.source,
            llm: file.llm,
            source_attribution,
        })
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(&mut self, cli_args: &CliArgs) {
        let attribution = &mut self.source_attribution;
        let mut mark = |key: &str| {
            attribution.insert(key.to_string(), ConfigSource::Cli);
        };

        if let Some(verbose) = cli_args.verbose {
            self.defaults.verbose = verbose;
            mark("defaults.verbose");
        }
        if let Some(max_total_bytes) = cli_args.max_total_bytes {
            self.selection.max_total_bytes = max_total_bytes;
            mark("selection.max_total_bytes");
        }
        if let Some(max_file_bytes) = cli_args.max_file_bytes {
            self.selection.max_file_bytes = max_file_bytes;
            mark("selection.max_file_bytes");
        }
        if let Some(max_tokens) = cli_args.chunk_max_tokens {
            self.chunking.max_tokens = max_tokens;
            mark("chunking.max_tokens");
        }
        if let Some(provider) = &cli_args.llm_provider {
            self.llm.provider = Some(provider.clone());
            mark("llm.provider");
        }
        if let Some(model) = &cli_args.model {
            self.llm.model = Some(model.clone());
            mark("llm.model");
        }
    }
}
