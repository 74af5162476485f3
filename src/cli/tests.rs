//! CLI tests module
//!
//! Argument parsing, exit code mapping, error reports and text rendering.

use super::commands::{
    ChunkPlan, format_bytes, render_chunk_plan, render_selection, render_summary,
    repository_name,
};
use super::run::{exit_code_for, render_error};
use super::*;
use crate::test_support::sample_web_repo;
use crate::{
    ChunkStat, Config, ConfigError, ExitCode, LlmError, RepoAnalyzer, RepoGlanceError,
    SourceError,
};
use clap::Parser;
use std::path::Path;

fn offline_analyzer() -> RepoAnalyzer {
    RepoAnalyzer::offline(Config::builder().build().unwrap())
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

#[test]
fn test_parse_select_with_json() {
    let cli = Cli::try_parse_from(["repoglance", "select", "./repo", "--json"]).unwrap();
    match cli.command {
        Commands::Select { path, json } => {
            assert_eq!(path, Path::new("./repo"));
            assert!(json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_analyze_offline() {
    let cli = Cli::try_parse_from(["repoglance", "analyze", ".", "--offline"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Analyze {
            offline: true,
            json: false,
            ..
        }
    ));
    assert_eq!(cli.command.name(), "analyze");
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "repoglance",
        "chunk",
        ".",
        "--chunk-tokens",
        "2000",
        "--max-total-bytes",
        "4096",
        "-v",
    ])
    .unwrap();

    let args = cli.to_cli_args();
    assert_eq!(args.chunk_max_tokens, Some(2000));
    assert_eq!(args.max_total_bytes, Some(4096));
    assert_eq!(args.verbose, Some(true));
    assert_eq!(args.max_file_bytes, None);
}

#[test]
fn test_unset_verbose_does_not_override_config() {
    let cli = Cli::try_parse_from(["repoglance", "config"]).unwrap();
    let args = cli.to_cli_args();
    assert_eq!(args.verbose, None);
    assert_eq!(args.llm_provider, None);
    assert_eq!(args.config_path, None);
}

#[test]
fn test_provider_and_model_flags() {
    let cli = Cli::try_parse_from([
        "repoglance",
        "analyze",
        ".",
        "--llm-provider",
        "anthropic",
        "--model",
        "claude-haiku",
    ])
    .unwrap();
    let args = cli.to_cli_args();
    assert_eq!(args.llm_provider.as_deref(), Some("anthropic"));
    assert_eq!(args.model.as_deref(), Some("claude-haiku"));
}

#[test]
fn test_missing_path_is_rejected() {
    assert!(Cli::try_parse_from(["repoglance", "select"]).is_err());
    assert!(Cli::try_parse_from(["repoglance", "bogus"]).is_err());
}

#[test]
fn test_build_cli_is_consistent() {
    build_cli().debug_assert();
}

// ---------------------------------------------------------------------------
// Exit codes and error reports
// ---------------------------------------------------------------------------

#[test]
fn test_exit_code_for_wrapped_errors() {
    let config: anyhow::Error = RepoGlanceError::Config(ConfigError::InvalidFile("x".into())).into();
    assert_eq!(exit_code_for(&config), ExitCode::CLI_ARGS);

    let source: anyhow::Error = RepoGlanceError::Source(SourceError::NotFound {
        path: "/missing".into(),
    })
    .into();
    assert_eq!(exit_code_for(&source), ExitCode::SOURCE_ERROR);

    let outage: anyhow::Error = RepoGlanceError::Llm(LlmError::ProviderOutage("503".into())).into();
    assert_eq!(exit_code_for(&outage), ExitCode::LLM_FAILURE);

    let misconfigured: anyhow::Error =
        RepoGlanceError::Llm(LlmError::Misconfiguration("no key".into())).into();
    assert_eq!(exit_code_for(&misconfigured), ExitCode::CLI_ARGS);
}

#[test]
fn test_exit_code_for_bare_errors() {
    let config = anyhow::Error::new(ConfigError::NotFound {
        path: "/nope.toml".into(),
    });
    assert_eq!(exit_code_for(&config), ExitCode::CLI_ARGS);

    let source = anyhow::Error::new(SourceError::NotADirectory {
        path: "Cargo.toml".into(),
    });
    assert_eq!(exit_code_for(&source), ExitCode::SOURCE_ERROR);

    let quota = anyhow::Error::new(LlmError::ProviderQuota("429".into()));
    assert_eq!(exit_code_for(&quota), ExitCode::LLM_FAILURE);

    let other = anyhow::anyhow!("something else");
    assert_eq!(exit_code_for(&other), ExitCode::INTERNAL);
}

#[test]
fn test_render_error_includes_suggestions() {
    let err: anyhow::Error = RepoGlanceError::Source(SourceError::NotFound {
        path: "/missing".into(),
    })
    .into();
    let report = render_error(&err, "select");
    assert!(report.starts_with("Error:"));
    assert!(report.contains("/missing"));
    assert!(report.contains("Suggestions:"));
}

#[test]
fn test_render_error_fallback_names_operation() {
    let err = anyhow::anyhow!("disk on fire");
    let report = render_error(&err, "chunk");
    assert!(report.contains("chunk failed"));
    assert!(report.contains("disk on fire"));
    assert!(report.contains("--verbose"));
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn test_format_bytes() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(1023), "1023 B");
    assert_eq!(format_bytes(1536), "1.5 KiB");
    assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
}

#[test]
fn test_render_selection_lists_files_in_order() {
    let (report, _) = offline_analyzer().select(&sample_web_repo());
    let text = render_selection(&report);

    assert!(text.starts_with(&format!("Selected {} key files", report.key_files.len())));
    let readme = text.find("README.md").unwrap();
    let package = text.find("package.json").unwrap();
    assert!(readme < package);
    assert!(!text.contains("Selection stopped"));
}

#[test]
fn test_render_selection_reports_halt() {
    let config = Config::builder()
        .max_file_bytes(100)
        .max_total_bytes(150)
        .build()
        .unwrap();
    let files = vec![
        crate::FileRecord::new("README.md", "r".repeat(400)),
        crate::FileRecord::new("package.json", "p".repeat(60)),
    ];
    let (report, _) = RepoAnalyzer::offline(config).select(&files);
    let text = render_selection(&report);

    assert!(report.halted);
    assert!(text.contains("(truncated)"));
    assert!(text.contains("Selection stopped"));
}

#[test]
fn test_render_chunk_plan() {
    let analyzer = offline_analyzer();
    let (report, selected) = analyzer.select(&sample_web_repo());
    let chunks = analyzer.chunker().chunk(&selected);
    let plan = ChunkPlan {
        ceiling_bytes: analyzer.chunker().ceiling_bytes(),
        key_files: report.key_files.len(),
        chunks: chunks
            .iter()
            .enumerate()
            .map(|(i, c)| ChunkStat::from_chunk(i + 1, c))
            .collect(),
    };

    let text = render_chunk_plan(&plan);
    assert!(text.contains("in 1 chunk(s)"));
    assert!(text.contains("chunk 1:"));
    assert!(text.contains("    README.md"));
    assert!(!text.contains("over budget"));
}

#[tokio::test]
async fn test_render_summary_sections() {
    let summary = offline_analyzer()
        .analyze("demo", &sample_web_repo())
        .await;
    let text = render_summary(&summary);

    assert!(text.starts_with("# demo\n"));
    assert!(text.contains("Frameworks: Express, React"));
    assert!(text.contains("## Key files"));
    assert!(text.contains("- README.md [documentation]"));
    assert!(text.contains("## Structure"));
    assert!(!text.contains("## Chunk analyses"));
    assert!(!text.contains("## Warnings"));
}

#[test]
fn test_repository_name_falls_back_to_input() {
    assert_eq!(
        repository_name(Path::new("/definitely/not/here")),
        "/definitely/not/here"
    );

    let dir = tempfile::TempDir::new().unwrap();
    let named = dir.path().join("my-project");
    std::fs::create_dir(&named).unwrap();
    assert_eq!(repository_name(&named), "my-project");
}
