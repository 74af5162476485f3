//! Command implementations and human-readable rendering

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, info};

use crate::{
    ChunkStat, ChunkStatus, Config, FileRecord, LocalSource, RepoAnalyzer, RepoGlanceError,
    RepoSummary, SelectionReport, emit_jcs,
};

/// Chunk layout as printed by `repoglance chunk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(super) struct ChunkPlan {
    pub ceiling_bytes: usize,
    pub key_files: usize,
    pub chunks: Vec<ChunkStat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ConfigEntry {
    value: String,
    source: String,
}

fn load_files(path: &Path, config: &Config) -> Result<Vec<FileRecord>> {
    let source = LocalSource::new(path, &config.source).map_err(RepoGlanceError::from)?;
    let (files, stats) = source.collect_with_stats().map_err(RepoGlanceError::from)?;
    debug!(root = %source.root(), ?stats, "Repository walk finished");
    Ok(files)
}

/// Directory name of the repository, or the path as given.
pub(super) fn repository_name(path: &Path) -> String {
    path.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| path.display().to_string())
}

pub(super) fn execute_select_command(path: &Path, json: bool, config: &Config) -> Result<()> {
    let files = load_files(path, config)?;
    let (report, _) = RepoAnalyzer::offline(config.clone()).select(&files);

    if json {
        println!("{}", emit_jcs(&report)?);
    } else {
        print!("{}", render_selection(&report));
    }
    Ok(())
}

pub(super) fn execute_chunk_command(path: &Path, json: bool, config: &Config) -> Result<()> {
    let files = load_files(path, config)?;
    let analyzer = RepoAnalyzer::offline(config.clone());
    let (report, selected) = analyzer.select(&files);

    let chunks = analyzer.chunker().chunk(&selected);
    let plan = ChunkPlan {
        ceiling_bytes: analyzer.chunker().ceiling_bytes(),
        key_files: report.key_files.len(),
        chunks: chunks
            .iter()
            .enumerate()
            .map(|(position, chunk)| ChunkStat::from_chunk(position + 1, chunk))
            .collect(),
    };

    if json {
        println!("{}", emit_jcs(&plan)?);
    } else {
        print!("{}", render_chunk_plan(&plan));
    }
    Ok(())
}

pub(super) async fn execute_analyze_command(
    path: &Path,
    offline: bool,
    json: bool,
    config: &Config,
) -> Result<()> {
    let files = load_files(path, config)?;

    let backend = if offline {
        info!("Offline mode, summarizer disabled");
        None
    } else {
        repoglance_llm::from_config(config).map_err(RepoGlanceError::Llm)?
    };

    let analyzer = RepoAnalyzer::new(config.clone(), backend);
    let summary = analyzer.analyze(&repository_name(path), &files).await;

    if json {
        println!("{}", emit_jcs(&summary)?);
    } else {
        print!("{}", render_summary(&summary));
    }

    // The report is still printed; the exit code carries the failure.
    if summary.all_chunks_failed()
        && let Some(cause) = summary.first_failure()
    {
        return Err(RepoGlanceError::Llm(cause.clone()).into());
    }
    Ok(())
}

pub(super) fn execute_config_command(json: bool, config: &Config) -> Result<()> {
    let effective = config.effective_config();

    if json {
        let entries: BTreeMap<String, ConfigEntry> = effective
            .into_iter()
            .map(|(key, (value, source))| (key, ConfigEntry { value, source }))
            .collect();
        println!("{}", emit_jcs(&entries)?);
    } else {
        print!("{}", render_config(&effective));
    }
    Ok(())
}

/// `1536` -> `1.5 KiB`.
#[allow(clippy::cast_precision_loss)]
pub(super) fn format_bytes(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * 1024;
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    }
}

pub(super) fn render_selection(report: &SelectionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Selected {} key files ({} of {} budget)",
        report.key_files.len(),
        format_bytes(report.selected_bytes),
        format_bytes(report.max_total_bytes)
    );
    for file in &report.key_files {
        let marker = if file.truncated { " (truncated)" } else { "" };
        let _ = writeln!(
            out,
            "  {:<18} {} [{}]{marker}",
            file.tier.as_str(),
            file.path,
            format_bytes(file.size)
        );
    }
    if report.halted {
        let _ = writeln!(
            out,
            "\n! Selection stopped at the aggregate cap; lower-priority files were left out"
        );
    }
    out
}

pub(super) fn render_chunk_plan(plan: &ChunkPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} key files in {} chunk(s), ceiling {}",
        plan.key_files,
        plan.chunks.len(),
        format_bytes(plan.ceiling_bytes)
    );
    for chunk in &plan.chunks {
        let over = if chunk.rendered_bytes > plan.ceiling_bytes {
            " (over budget)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  chunk {}: {} file(s), {} rendered, blake3 {}{over}",
            chunk.index,
            chunk.file_count,
            format_bytes(chunk.rendered_bytes),
            &chunk.blake3[..chunk.blake3.len().min(12)]
        );
        for path in &chunk.paths {
            let _ = writeln!(out, "    {path}");
        }
    }
    out
}

pub(super) fn render_summary(summary: &RepoSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", summary.repository);
    let _ = writeln!(
        out,
        "Files: {} ({})",
        summary.total_files,
        format_bytes(summary.total_bytes)
    );

    if !summary.languages.is_empty() {
        let languages: Vec<String> = summary
            .languages
            .iter()
            .map(|l| format!("{} {:.1}%", l.language, l.percentage))
            .collect();
        let _ = writeln!(out, "Languages: {}", languages.join(", "));
    }
    if !summary.frameworks.is_empty() {
        let _ = writeln!(out, "Frameworks: {}", summary.frameworks.join(", "));
    }

    let q = &summary.quality;
    let present: Vec<&str> = [
        (q.has_readme, "README"),
        (q.has_license, "license"),
        (q.has_tests, "tests"),
        (q.has_ci, "CI"),
        (q.has_container, "container"),
        (q.has_lint_config, "lint/format"),
        (q.has_type_checking, "type checking"),
        (q.has_lockfile, "lockfile"),
    ]
    .into_iter()
    .filter_map(|(present, label)| present.then_some(label))
    .collect();
    let _ = writeln!(
        out,
        "Quality: {}/{} ({})",
        q.score(),
        crate::QualitySignals::MAX_SCORE,
        if present.is_empty() {
            "none".to_string()
        } else {
            present.join(", ")
        }
    );

    if !summary.key_directories.is_empty() {
        let dirs: Vec<String> = summary
            .key_directories
            .iter()
            .map(|d| format!("{} ({})", d.name, d.file_count))
            .collect();
        let _ = writeln!(out, "Key directories: {}", dirs.join(", "));
    }

    let _ = writeln!(out, "\n## Key files\n");
    for file in &summary.key_files {
        let marker = if file.truncated { ", truncated" } else { "" };
        let _ = writeln!(out, "- {} [{}{marker}]", file.path, file.tier);
    }

    if !summary.tree.is_empty() {
        let _ = writeln!(out, "\n## Structure\n\n{}", summary.tree);
    }

    if !summary.analyses.is_empty() {
        let _ = writeln!(out, "\n## Chunk analyses");
        let total = summary.analyses.len();
        for analysis in &summary.analyses {
            let status = match analysis.status {
                ChunkStatus::Completed => "",
                ChunkStatus::Failed => " (failed)",
            };
            let _ = writeln!(
                out,
                "\n### Chunk {}/{total}{status}\n\n{}",
                analysis.index, analysis.text
            );
        }
    }

    if !summary.findings.is_empty() {
        let _ = writeln!(out, "\n## Findings\n");
        for finding in &summary.findings {
            let _ = writeln!(out, "- [{}] {}", finding.category, finding.text);
        }
    }

    if !summary.warnings.is_empty() {
        let _ = writeln!(out, "\n## Warnings\n");
        for warning in &summary.warnings {
            let _ = writeln!(out, "- {warning}");
        }
    }
    out
}

fn render_config(effective: &BTreeMap<String, (String, String)>) -> String {
    let width = effective.keys().map(String::len).max().unwrap_or(0);
    let mut out = String::new();
    for (key, (value, source)) in effective {
        let _ = writeln!(out, "{key:<width$}  {value}  [{source}]");
    }
    out
}
