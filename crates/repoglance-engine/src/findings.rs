//! Finding extraction from summarizer responses

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Shortest finding kept, in characters after cleanup
const MIN_FINDING_CHARS: usize = 15;

/// Bullet (`-`, `*`, `+`, `•`) or numbered (`1.`, `2)`) list item
static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*+•]|\d{1,3}[.)])\s+(.+?)\s*$").unwrap());

/// Markdown emphasis and inline code markers
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*|__|\*|`").unwrap());

/// Checked in this order; the first category with a matching keyword wins.
const CATEGORY_KEYWORDS: &[(FindingCategory, &[&str])] = &[
    (
        FindingCategory::Security,
        &[
            "security", "secret", "credential", "password", "token", "auth", "injection",
            "xss", "csrf", "vulnerab", "sanitiz", "encrypt",
        ],
    ),
    (
        FindingCategory::Testing,
        &["test", "coverage", "mock", "fixture", "assert"],
    ),
    (
        FindingCategory::Performance,
        &[
            "performance", "latency", "cache", "caching", "memory", "slow", "allocation",
            "concurren", "async", "throughput",
        ],
    ),
    (
        FindingCategory::Architecture,
        &[
            "architecture", "module", "layer", "component", "dependency", "dependencies",
            "coupling", "separation", "structure", "design", "pattern",
        ],
    ),
    (
        FindingCategory::Quality,
        &[
            "quality", "lint", "format", "naming", "duplicat", "readab", "maintainab",
            "documentation", "comment", "error handling", "refactor",
        ],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    Architecture,
    Security,
    Testing,
    Performance,
    Quality,
    General,
}

impl FindingCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Architecture => "architecture",
            Self::Security => "security",
            Self::Testing => "testing",
            Self::Performance => "performance",
            Self::Quality => "quality",
            Self::General => "general",
        }
    }

    fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map_or(Self::General, |(category, _)| *category)
    }
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub text: String,
}

/// Pull list-item findings out of free-form responses.
///
/// Responses are scanned in order. Emphasis markers are stripped, fragments
/// shorter than 15 characters are dropped, and duplicates are removed
/// case-insensitively (first occurrence wins). At most `limit` findings are
/// returned.
#[must_use]
pub fn extract_findings<S: AsRef<str>>(responses: &[S], limit: usize) -> Vec<Finding> {
    let mut seen = HashSet::new();
    let mut findings = Vec::new();

    let items = responses
        .iter()
        .flat_map(|response| response.as_ref().lines())
        .filter_map(|line| LIST_ITEM.captures(line))
        .map(|caps| clean(&caps[1]));

    for text in items {
        if findings.len() >= limit {
            break;
        }
        if text.chars().count() < MIN_FINDING_CHARS || !seen.insert(text.to_lowercase()) {
            continue;
        }
        findings.push(Finding {
            category: FindingCategory::classify(&text),
            text,
        });
    }

    findings
}

fn clean(item: &str) -> String {
    let stripped = EMPHASIS.replace_all(item, "");
    stripped.trim().trim_end_matches(':').trim().to_string()
}
