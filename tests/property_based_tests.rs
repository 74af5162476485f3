//! Property-based tests for selection and chunking
//!
//! These tests drive the public `Selector` and `Chunker` APIs with generated
//! repositories and check the invariants every run must uphold, whatever
//! the file mix and budgets.
//!
//! ## Configuration
//!
//! Property test case counts can be configured via environment variables:
//!
//! - `PROPTEST_CASES`: Number of test cases per property (default: 64)
//! - `PROPTEST_MAX_SHRINK_ITERS`: Max shrinking iterations on failure (default: 1000)
//!
//! ```bash
//! # Run with more cases for thorough local testing
//! PROPTEST_CASES=256 cargo test --test property_based_tests
//! ```

use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::env;

use repoglance::{Chunker, ChunkPolicy, FileRecord, SelectionPolicy, Selector, render_file_block};

/// Default number of test cases per property.
const DEFAULT_PROPTEST_CASES: u32 = 64;

/// Default max shrink iterations.
const DEFAULT_MAX_SHRINK_ITERS: u32 = 1000;

/// Creates a ProptestConfig that respects environment variables.
///
/// `max_cases` caps the case count for slow properties even when
/// `PROPTEST_CASES` asks for more.
fn proptest_config(max_cases: Option<u32>) -> ProptestConfig {
    let env_cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_PROPTEST_CASES);

    let env_shrink_iters = env::var("PROPTEST_MAX_SHRINK_ITERS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_MAX_SHRINK_ITERS);

    let cases = match max_cases {
        Some(max) => env_cases.min(max),
        None => env_cases,
    };

    ProptestConfig {
        cases,
        max_shrink_iters: env_shrink_iters,
        max_shrink_time: 30000,
        ..ProptestConfig::default()
    }
}

const DIRS: &[&str] = &["", "src/", "lib/", "src/app/", "docs/", "tests/", "a/b/c/"];

const NAMES: &[&str] = &[
    "README.md",
    "LICENSE",
    "package.json",
    "Cargo.toml",
    "Dockerfile",
    "index.js",
    "main.rs",
    "app.py",
    "server.go",
    "util.js",
    "notes.txt",
    "mod.rs",
    "helpers.ts",
];

/// A repository of unique paths drawn from a vocabulary that hits every tier.
fn arb_repository() -> impl Strategy<Value = Vec<FileRecord>> {
    prop::collection::vec(
        (
            0..DIRS.len(),
            0..NAMES.len(),
            0usize..3_000,
            prop::char::range('a', 'z'),
        ),
        0..40,
    )
    .prop_map(|entries| {
        let mut by_path = BTreeMap::new();
        for (dir, name, size, fill) in entries {
            let path = format!("{}{}", DIRS[dir], NAMES[name]);
            by_path
                .entry(path.clone())
                .or_insert_with(|| FileRecord::new(path, fill.to_string().repeat(size)));
        }
        by_path.into_values().collect()
    })
}

fn policy(max_file_bytes: usize, max_total_bytes: usize) -> SelectionPolicy {
    SelectionPolicy {
        max_file_bytes,
        max_total_bytes,
        ..SelectionPolicy::default()
    }
}

proptest! {
    #![proptest_config(proptest_config(None))]

    #[test]
    fn prop_aggregate_cap_is_only_exceeded_by_the_last_file(
        files in arb_repository(),
        max_file in 1usize..2_000,
        max_total in 1usize..8_000,
    ) {
        let selected = Selector::new(policy(max_file, max_total)).select(&files);

        if let Some((_, head)) = selected.split_last() {
            let before_last: usize = head.iter().map(|f| f.size).sum();
            prop_assert!(before_last <= max_total);
        }
    }

    #[test]
    fn prop_every_selected_file_respects_the_per_file_cap(
        files in arb_repository(),
        max_file in 1usize..2_000,
        max_total in 1usize..8_000,
    ) {
        let policy = policy(max_file, max_total);
        let marker_len = policy.truncation_marker.len();
        let selected = Selector::new(policy).select(&files);

        for file in &selected {
            prop_assert!(file.size <= max_file + marker_len);
            prop_assert_eq!(file.size, file.content.len());
        }
    }

    #[test]
    fn prop_selection_is_unique_and_drawn_from_input(
        files in arb_repository(),
        max_total in 1usize..20_000,
    ) {
        let selected = Selector::new(policy(1_500, max_total)).select(&files);

        let mut seen = HashSet::new();
        for file in &selected {
            prop_assert!(seen.insert(file.path.clone()), "duplicate path {}", file.path);

            let original = files.iter().find(|f| f.path == file.path);
            prop_assert!(original.is_some());
            let original = original.unwrap();
            if original.size <= 1_500 {
                prop_assert_eq!(file, original);
            } else {
                prop_assert!(file.content.starts_with(&original.content[..1_500]));
            }
        }
    }

    #[test]
    fn prop_selection_is_deterministic(
        files in arb_repository(),
        max_total in 1usize..20_000,
    ) {
        let selector = Selector::new(policy(1_000, max_total));
        prop_assert_eq!(selector.select(&files), selector.select(&files));
    }

    #[test]
    fn prop_reselecting_an_unbudgeted_selection_is_a_no_op(files in arb_repository()) {
        let selector = Selector::new(policy(10_000, 1_000_000));
        let once = selector.select(&files);
        let twice = selector.select(&once);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_chunks_cover_selection_in_order(
        files in arb_repository(),
        max_tokens in 1usize..2_000,
    ) {
        let selected = Selector::new(SelectionPolicy::default()).select(&files);
        let chunker = Chunker::new(ChunkPolicy { max_tokens, chars_per_token: 4 });
        let chunks = chunker.chunk(&selected);

        let paths: Vec<&str> = chunks
            .iter()
            .flat_map(|c| c.paths.iter().map(String::as_str))
            .collect();
        let expected: Vec<&str> = selected.iter().map(|f| f.path.as_str()).collect();
        prop_assert_eq!(paths, expected);

        let content: String = chunks.iter().map(|c| c.content.as_str()).collect();
        let rendered: String = selected.iter().map(render_file_block).collect();
        prop_assert_eq!(content, rendered);

        for chunk in &chunks {
            prop_assert!(chunk.file_count > 0);
            prop_assert_eq!(chunk.file_count, chunk.paths.len());
            if chunk.file_count > 1 {
                prop_assert!(chunk.rendered_len() <= chunker.ceiling_bytes());
            }
        }
    }
}

proptest! {
    #![proptest_config(proptest_config(Some(16)))]

    #[test]
    fn prop_small_repositories_get_the_fallback_pass(
        names in prop::collection::btree_set("[a-z]{1,8}\\.txt", 1..8),
    ) {
        let files: Vec<FileRecord> = names
            .iter()
            .map(|name| FileRecord::new(name.as_str(), "plain text\n"))
            .collect();
        let selected = Selector::new(SelectionPolicy::default()).select(&files);

        let selected_paths: Vec<&str> = selected.iter().map(|f| f.path.as_str()).collect();
        let expected: Vec<&str> = names.iter().map(String::as_str).collect();
        prop_assert_eq!(selected_paths, expected);
    }
}
