use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use repoglance_utils::types::ConfigSource;

/// Default per-file cap: 100 KiB.
pub const DEFAULT_MAX_FILE_BYTES: usize = 100 * 1024;

/// Default aggregate cap across all selected files: 50 KiB.
pub const DEFAULT_MAX_TOTAL_BYTES: usize = 50 * 1024;

/// Default token budget for one summarizer chunk.
pub const DEFAULT_CHUNK_MAX_TOKENS: usize = 8_000;

/// Default characters-per-token ratio used to turn tokens into bytes.
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

/// Marker appended to content cut at the per-file cap.
pub const DEFAULT_TRUNCATION_MARKER: &str = "\n... [truncated]";

const DOC_NAMES: &[&str] = &[
    "README.md",
    "README.rst",
    "README.txt",
    "README",
    "readme.md",
    "LICENSE",
    "LICENSE.md",
    "LICENSE.txt",
    "CONTRIBUTING.md",
    "CHANGELOG.md",
    "ARCHITECTURE.md",
];

const CONFIG_NAMES: &[&str] = &[
    "package.json",
    "Cargo.toml",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "requirements.txt",
    "go.mod",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "Gemfile",
    "composer.json",
    "tsconfig.json",
    "webpack.config.js",
    "vite.config.js",
    "vite.config.ts",
    "next.config.js",
    "babel.config.js",
    ".babelrc",
    ".eslintrc",
    ".eslintrc.js",
    ".eslintrc.json",
    ".prettierrc",
    ".prettierrc.json",
    ".editorconfig",
    "rustfmt.toml",
    "Makefile",
    "CMakeLists.txt",
    "Dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
    ".env.example",
];

const ENTRY_STEMS: &[&str] = &["index", "main", "app", "server"];

const ENTRY_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "mjs", "py", "go", "rs", "java", "rb", "php",
];

const SOURCE_DIRS: &[&str] = &[
    "src",
    "lib",
    "app",
    "api",
    "core",
    "pkg",
    "cmd",
    "internal",
    "components",
    "pages",
    "routes",
    "controllers",
    "services",
    "models",
    "utils",
];

const SKIP_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "target",
    "dist",
    "build",
    "out",
    "__pycache__",
    ".venv",
    "venv",
    "vendor",
    ".next",
    "coverage",
];

const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "svgz", "pdf", "zip", "gz", "tgz", "bz2",
    "xz", "7z", "rar", "jar", "war", "class", "exe", "dll", "so", "dylib", "a", "o", "obj", "bin",
    "wasm", "woff", "woff2", "ttf", "otf", "eot", "mp3", "mp4", "wav", "ogg", "mov", "avi",
    "sqlite", "db", "pyc",
];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

/// Immutable selection policy: byte caps, tier name sets and tier limits.
///
/// One value is handed to the selector per run; nothing in the selection core
/// reads global state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionPolicy {
    /// Files larger than this are truncated to exactly this many bytes
    pub max_file_bytes: usize,
    /// Soft ceiling on the summed size of all selected files
    pub max_total_bytes: usize,
    /// Maximum files contributed by the source-directory tier
    pub source_dir_limit: usize,
    /// Fallback runs when fewer than this many files were selected
    pub fallback_threshold: usize,
    /// Size of the fallback candidate window
    pub fallback_limit: usize,
    /// Deepest slash count a fallback candidate may have
    pub fallback_max_depth: usize,
    /// Documentation and license base names (exact, case-sensitive)
    pub doc_names: Vec<String>,
    /// Build, lint, format, container and environment config base names
    pub config_names: Vec<String>,
    /// Entry-point base names
    pub entry_names: Vec<String>,
    /// Important directory names, highest priority first
    pub source_dirs: Vec<String>,
    /// Appended to content cut at `max_file_bytes`
    pub truncation_marker: String,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        let entry_names = ENTRY_STEMS
            .iter()
            .flat_map(|stem| ENTRY_EXTENSIONS.iter().map(move |ext| format!("{stem}.{ext}")))
            .collect();

        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            source_dir_limit: 20,
            fallback_threshold: 5,
            fallback_limit: 20,
            fallback_max_depth: 1,
            doc_names: owned(DOC_NAMES),
            config_names: owned(CONFIG_NAMES),
            entry_names,
            source_dirs: owned(SOURCE_DIRS),
            truncation_marker: DEFAULT_TRUNCATION_MARKER.to_string(),
        }
    }
}

/// Chunk sizing for the summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChunkPolicy {
    pub max_tokens: usize,
    pub chars_per_token: usize,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_CHUNK_MAX_TOKENS,
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
        }
    }
}

impl ChunkPolicy {
    /// Approximate byte budget of one chunk.
    #[must_use]
    pub const fn ceiling_bytes(&self) -> usize {
        self.max_tokens.saturating_mul(self.chars_per_token)
    }
}

/// Local repository walking limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSettings {
    /// Directory levels below the root that are still descended into
    pub max_depth: usize,
    /// Files larger than this are skipped by the source
    pub max_file_bytes: u64,
    /// Directory names never descended into
    pub skip_dirs: Vec<String>,
    /// Extensions treated as binary and skipped
    pub binary_extensions: Vec<String>,
    /// Extra glob patterns (relative to the root) to skip
    pub exclude: Vec<String>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_file_bytes: 1024 * 1024,
            skip_dirs: owned(SKIP_DIRS),
            binary_extensions: owned(BINARY_EXTENSIONS),
            exclude: Vec::new(),
        }
    }
}

/// Summarizer provider configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmConfig {
    /// `anthropic` or `none` (default: `none`)
    pub provider: Option<String>,
    pub model: Option<String>,
    /// Environment variable holding the API key (default: `ANTHROPIC_API_KEY`)
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
    /// Wait before the single retry of a transient failure
    pub retry_delay_ms: Option<u64>,
}

impl LlmConfig {
    #[must_use]
    pub fn provider(&self) -> &str {
        self.provider.as_deref().unwrap_or("none")
    }

    #[must_use]
    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or("ANTHROPIC_API_KEY")
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(120))
    }

    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms.unwrap_or(2_000))
    }
}

/// General defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub verbose: bool,
}

/// Resolved configuration for one repoglance invocation.
///
/// Built by [`Config::discover`] (CLI-like behaviour) or [`Config::builder`]
/// (embedding and tests). `source_attribution` records where every
/// non-default value came from, keyed as `section.key`.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub defaults: Defaults,
    pub selection: SelectionPolicy,
    pub chunking: ChunkPolicy,
    pub source: SourceSettings,
    pub llm: LlmConfig,
    pub source_attribution: HashMap<String, ConfigSource>,
}

impl Config {
    /// Source of the value at `key`, falling back to [`ConfigSource::Default`].
    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .cloned()
            .unwrap_or(ConfigSource::Default)
    }
}
