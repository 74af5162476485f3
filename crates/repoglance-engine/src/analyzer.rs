//! End-to-end repository analysis

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{Instrument, info, warn};

use repoglance_config::Config;
use repoglance_llm::{LlmBackend, LlmError};
use repoglance_packet::{Chunker, ContentChunk, Selector, Tier};
use repoglance_utils::logging::analysis_span;
use repoglance_utils::types::FileRecord;

use crate::findings::{Finding, extract_findings};
use crate::overview::{
    KeyDirectory, LanguageStat, QualitySignals, detect_frameworks, detect_languages,
    key_directories, quality_signals, render_tree,
};
use crate::summarize::{ChunkAnalysis, ChunkSummarizer};

const TREE_MAX_DEPTH: usize = 3;
const TREE_MAX_ENTRIES: usize = 60;
const KEY_DIRECTORY_LIMIT: usize = 10;
const FINDINGS_LIMIT: usize = 20;

/// A selected key file as reported in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFile {
    pub path: String,
    /// Size after truncation, marker included
    pub size: usize,
    pub tier: Tier,
    pub truncated: bool,
}

/// Layout of one chunk as sent to the summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkStat {
    pub index: usize,
    pub file_count: usize,
    pub total_size: usize,
    pub rendered_bytes: usize,
    pub blake3: String,
    pub paths: Vec<String>,
}

impl ChunkStat {
    #[must_use]
    pub fn from_chunk(index: usize, chunk: &ContentChunk) -> Self {
        Self {
            index,
            file_count: chunk.file_count,
            total_size: chunk.total_size,
            rendered_bytes: chunk.rendered_len(),
            blake3: chunk.blake3_hash(),
            paths: chunk.paths.clone(),
        }
    }
}

/// Outcome of key file selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionReport {
    pub key_files: Vec<KeyFile>,
    pub selected_bytes: usize,
    pub max_total_bytes: usize,
    /// The aggregate cap rejected a file and ended the run
    pub halted: bool,
}

impl SelectionReport {
    #[must_use]
    pub fn truncated_count(&self) -> usize {
        self.key_files.iter().filter(|f| f.truncated).count()
    }
}

/// Everything repoglance knows about one repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub repository: String,
    pub generated_at: DateTime<Utc>,
    pub total_files: usize,
    pub total_bytes: usize,
    pub languages: Vec<LanguageStat>,
    pub frameworks: Vec<String>,
    pub tree: String,
    pub key_directories: Vec<KeyDirectory>,
    pub quality: QualitySignals,
    pub key_files: Vec<KeyFile>,
    pub selected_bytes: usize,
    pub selection_halted: bool,
    pub chunks: Vec<ChunkStat>,
    /// Summarizer used, absent for offline runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub analyses: Vec<ChunkAnalysis>,
    pub findings: Vec<Finding>,
    pub warnings: Vec<String>,
}

impl RepoSummary {
    #[must_use]
    pub fn failed_chunks(&self) -> usize {
        self.analyses.iter().filter(|a| !a.is_completed()).count()
    }

    /// True when a summarizer ran and not a single chunk succeeded.
    #[must_use]
    pub fn all_chunks_failed(&self) -> bool {
        !self.analyses.is_empty() && self.failed_chunks() == self.analyses.len()
    }

    /// Error behind the first failed chunk.
    #[must_use]
    pub fn first_failure(&self) -> Option<&LlmError> {
        self.analyses.iter().find_map(|a| a.cause.as_ref())
    }
}

/// Runs overview, selection, chunking and (optionally) summarization.
pub struct RepoAnalyzer {
    config: Config,
    selector: Selector,
    chunker: Chunker,
    backend: Option<Box<dyn LlmBackend>>,
}

impl RepoAnalyzer {
    /// Without a backend the analysis is heuristic only.
    #[must_use]
    pub fn new(config: Config, backend: Option<Box<dyn LlmBackend>>) -> Self {
        Self {
            selector: Selector::new(config.selection.clone()),
            chunker: Chunker::new(config.chunking.clone()),
            config,
            backend,
        }
    }

    #[must_use]
    pub fn offline(config: Config) -> Self {
        Self::new(config, None)
    }

    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    #[must_use]
    pub const fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Analyze `files`, the full readable file set of `repository`.
    ///
    /// Never fails: summarizer errors are recorded per chunk and surfaced in
    /// `warnings`.
    pub async fn analyze(&self, repository: &str, files: &[FileRecord]) -> RepoSummary {
        self.run(repository, files)
            .instrument(analysis_span(repository))
            .await
    }

    /// Select key files from `files`.
    ///
    /// Returns the report and the selected records, truncated copies included,
    /// ready for chunking.
    #[must_use]
    pub fn select(&self, files: &[FileRecord]) -> (SelectionReport, Vec<FileRecord>) {
        let budget = self.selector.select_with_budget(files);
        let halted = budget.is_halted();
        let selected_bytes = budget.total_size();
        let selected = budget.into_selected();

        let report = SelectionReport {
            key_files: self.key_files(files, &selected),
            selected_bytes,
            max_total_bytes: self.selector.policy().max_total_bytes,
            halted,
        };
        (report, selected)
    }

    async fn run(&self, repository: &str, files: &[FileRecord]) -> RepoSummary {
        let policy = self.selector.policy();
        let mut warnings = Vec::new();

        if files.is_empty() {
            warnings.push("Repository contains no readable files".to_string());
        }

        let (selection, selected) = self.select(files);
        if selection.halted {
            warnings.push(format!(
                "Selection stopped at the {} byte aggregate cap; lower-priority files were left out",
                policy.max_total_bytes
            ));
        }

        let truncated = selection.truncated_count();
        if truncated > 0 {
            warnings.push(format!(
                "{truncated} key file(s) truncated to {} bytes",
                policy.max_file_bytes
            ));
        }

        let chunks = self.chunker.chunk(&selected);
        let ceiling = self.chunker.ceiling_bytes();
        for (position, chunk) in chunks.iter().enumerate() {
            if chunk.rendered_len() > ceiling {
                warnings.push(format!(
                    "Chunk {} holds a single file over the {ceiling} byte chunk budget ({} bytes)",
                    position + 1,
                    chunk.rendered_len()
                ));
            }
        }

        let analyses = match &self.backend {
            Some(backend) => {
                ChunkSummarizer::new(backend.as_ref(), &self.config.llm)
                    .summarize(&chunks)
                    .await
            }
            None => Vec::new(),
        };

        let responses: Vec<&str> = analyses
            .iter()
            .filter(|a| a.is_completed())
            .map(|a| a.text.as_str())
            .collect();
        let findings = extract_findings(&responses, FINDINGS_LIMIT);

        let mut summary = RepoSummary {
            repository: repository.to_string(),
            generated_at: Utc::now(),
            total_files: files.len(),
            total_bytes: files.iter().map(|f| f.size).sum(),
            languages: detect_languages(files),
            frameworks: detect_frameworks(files),
            tree: render_tree(files, TREE_MAX_DEPTH, TREE_MAX_ENTRIES),
            key_directories: key_directories(files, policy, KEY_DIRECTORY_LIMIT),
            quality: quality_signals(files),
            key_files: selection.key_files,
            selected_bytes: selection.selected_bytes,
            selection_halted: selection.halted,
            chunks: chunks
                .iter()
                .enumerate()
                .map(|(position, chunk)| ChunkStat::from_chunk(position + 1, chunk))
                .collect(),
            provider: self.backend.as_ref().map(|b| b.name().to_string()),
            analyses,
            findings,
            warnings,
        };

        let failed = summary.failed_chunks();
        if failed > 0 {
            let total = summary.analyses.len();
            warn!(failed, total, "Some chunk analyses failed");
            summary
                .warnings
                .push(format!("{failed} of {total} chunk analyses failed"));
        }

        info!(
            files = summary.total_files,
            key_files = summary.key_files.len(),
            chunks = summary.chunks.len(),
            findings = summary.findings.len(),
            "Repository analysis completed"
        );
        summary
    }

    fn key_files(&self, files: &[FileRecord], selected: &[FileRecord]) -> Vec<KeyFile> {
        let max_file_bytes = self.selector.policy().max_file_bytes;
        let mut originals: HashMap<&str, &FileRecord> = HashMap::new();
        for file in files {
            originals.entry(file.path.as_str()).or_insert(file);
        }

        selected
            .iter()
            .map(|file| {
                let original = originals.get(file.path.as_str()).copied();
                KeyFile {
                    path: file.path.clone(),
                    size: file.size,
                    tier: original
                        .and_then(|o| self.selector.classify(o))
                        .unwrap_or(Tier::Fallback),
                    truncated: original.is_some_and(|o| o.size > max_file_bytes),
                }
            })
            .collect()
    }
}
