use std::path::PathBuf;

/// CLI-provided overrides, applied with the highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit configuration file (skips discovery)
    pub config_path: Option<PathBuf>,
    pub verbose: Option<bool>,
    pub max_total_bytes: Option<usize>,
    pub max_file_bytes: Option<usize>,
    pub chunk_max_tokens: Option<usize>,
    pub llm_provider: Option<String>,
    pub model: Option<String>,
}
