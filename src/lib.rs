//! repoglance - budgeted key file selection and chunked summaries for repositories
//!
//! repoglance reads a checked-out repository, picks the files that say the
//! most about it (documentation, configuration, entry points, core source
//! directories) within a strict byte budget, folds them into bounded chunks
//! and, when a summarizer is configured, asks a language model about each
//! chunk in turn.
//!
//! repoglance can be used in two ways:
//! - **CLI**: run `repoglance select|chunk|analyze|config`
//! - **Library**: embed the selector, chunker or full analyzer
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Which files would be summarized?
//! repoglance select path/to/repo
//!
//! # How would they be chunked?
//! repoglance chunk path/to/repo --chunk-tokens 4000
//!
//! # Heuristic overview without any model calls
//! repoglance analyze path/to/repo --offline --json
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust
//! use repoglance::{Chunker, Config, FileRecord, Selector};
//!
//! let config = Config::builder().max_total_bytes(10_000).build().unwrap();
//! let files = vec![
//!     FileRecord::new("README.md", "# Demo\n"),
//!     FileRecord::new("src/main.rs", "fn main() {}\n"),
//! ];
//!
//! let selected = Selector::new(config.selection.clone()).select(&files);
//! assert_eq!(selected[0].path, "README.md");
//!
//! let chunks = Chunker::new(config.chunking.clone()).chunk(&selected);
//! assert_eq!(chunks.len(), 1);
//! ```
//!
//! # JSON Contracts
//!
//! All `--json` output is emitted in JCS (RFC 8785) canonical form. Use
//! [`emit_jcs`] for the same guarantees in your own integrations.
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Internal error |
//! | 2 | Invalid CLI arguments or configuration |
//! | 3 | Repository could not be read |
//! | 70 | Summarizer failure |

// ============================================================================
// Public API
// ============================================================================

/// Configuration for repoglance operations.
///
/// `Config` provides hierarchical configuration with discovery and precedence:
/// CLI arguments > config file > built-in defaults. Use
/// [`Config::discover()`] for CLI-like behavior or [`Config::builder()`] when
/// embedding.
pub use repoglance_config::Config;

pub use repoglance_config::{
    ChunkPolicy, CliArgs, ConfigBuilder, ConfigSource, LlmConfig, SelectionPolicy, SourceSettings,
};

/// Library-level error type with user-facing reporting and exit code mapping.
pub use repoglance_utils::error::RepoGlanceError;

pub use repoglance_utils::error::{ConfigError, LlmError, SourceError, UserFriendlyError};

/// Exit codes matching the documented exit code table.
pub use repoglance_utils::exit_codes::ExitCode;

/// One repository file: relative path, content and recorded size.
pub use repoglance_utils::types::FileRecord;

/// JCS (RFC 8785) canonical JSON emission.
pub use repoglance_utils::canonicalization::emit_jcs;

pub use repoglance_packet::{
    Admission, Chunker, ContentChunk, SelectionBudget, Selector, Tier, render_file_block,
};

pub use repoglance_source::{LocalSource, WalkStats};

pub use repoglance_llm::{LlmBackend, LlmInvocation, LlmResult, Message, RetryingBackend, Role};

pub use repoglance_engine::{
    ChunkAnalysis, ChunkStat, ChunkStatus, ChunkSummarizer, Finding, FindingCategory, KeyFile,
    QualitySignals, RepoAnalyzer, RepoSummary, SelectionReport,
};

// ============================================================================
// Internal modules (not part of the stable API)
// ============================================================================

pub use repoglance_utils::logging;

#[cfg(any(test, feature = "test-utils"))]
pub use repoglance_utils::test_support;

pub mod cli;
