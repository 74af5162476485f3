//! Repository analysis engine
//!
//! Ties the pieces together: overview heuristics over the full file set,
//! key file selection and chunking, per-chunk summaries from an optional
//! [`LlmBackend`](repoglance_llm::LlmBackend), and finding extraction.
//! [`RepoAnalyzer`] is the entry point.

mod analyzer;
mod findings;
mod overview;
mod summarize;

pub use analyzer::{ChunkStat, KeyFile, RepoAnalyzer, RepoSummary, SelectionReport};
pub use findings::{Finding, FindingCategory, extract_findings};
pub use overview::{
    KeyDirectory, LanguageStat, QualitySignals, detect_frameworks, detect_languages,
    key_directories, quality_signals, render_tree,
};
pub use summarize::{ChunkAnalysis, ChunkStatus, ChunkSummarizer};
