//! Heuristic repository overview
//!
//! Computed from the full file set, not just the selected key files. Nothing
//! here does I/O or talks to a model; malformed manifests simply contribute
//! nothing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

use repoglance_config::SelectionPolicy;
use repoglance_utils::types::FileRecord;

const LANGUAGES: &[(&str, &str)] = &[
    ("rs", "Rust"),
    ("py", "Python"),
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("mjs", "JavaScript"),
    ("cjs", "JavaScript"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("go", "Go"),
    ("java", "Java"),
    ("kt", "Kotlin"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("c", "C"),
    ("h", "C"),
    ("cc", "C++"),
    ("cpp", "C++"),
    ("hpp", "C++"),
    ("cs", "C#"),
    ("swift", "Swift"),
    ("scala", "Scala"),
    ("sh", "Shell"),
    ("bash", "Shell"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("scss", "SCSS"),
    ("vue", "Vue"),
    ("svelte", "Svelte"),
    ("sql", "SQL"),
    ("md", "Markdown"),
    ("json", "JSON"),
    ("yml", "YAML"),
    ("yaml", "YAML"),
    ("toml", "TOML"),
];

/// Dependency name to framework label. Go module paths also match on a
/// `/`-separated prefix so versioned paths (`.../echo/v4`) are recognised.
const FRAMEWORKS: &[(&str, &str)] = &[
    // JavaScript / TypeScript
    ("react", "React"),
    ("next", "Next.js"),
    ("vue", "Vue"),
    ("nuxt", "Nuxt"),
    ("svelte", "Svelte"),
    ("@angular/core", "Angular"),
    ("express", "Express"),
    ("fastify", "Fastify"),
    ("koa", "Koa"),
    ("@nestjs/core", "NestJS"),
    ("electron", "Electron"),
    ("jest", "Jest"),
    ("vitest", "Vitest"),
    // Rust
    ("axum", "Axum"),
    ("actix-web", "Actix Web"),
    ("rocket", "Rocket"),
    ("warp", "Warp"),
    ("tokio", "Tokio"),
    ("clap", "Clap"),
    ("bevy", "Bevy"),
    ("tauri", "Tauri"),
    // Python
    ("django", "Django"),
    ("flask", "Flask"),
    ("fastapi", "FastAPI"),
    ("pytest", "pytest"),
    ("numpy", "NumPy"),
    ("pandas", "pandas"),
    ("torch", "PyTorch"),
    ("tensorflow", "TensorFlow"),
    // Go
    ("github.com/gin-gonic/gin", "Gin"),
    ("github.com/labstack/echo", "Echo"),
    ("github.com/gofiber/fiber", "Fiber"),
    ("github.com/gorilla/mux", "Gorilla Mux"),
    ("github.com/spf13/cobra", "Cobra"),
    // Ruby
    ("rails", "Rails"),
    ("sinatra", "Sinatra"),
    ("rspec", "RSpec"),
    // PHP
    ("laravel/framework", "Laravel"),
    ("symfony/framework-bundle", "Symfony"),
    ("phpunit/phpunit", "PHPUnit"),
];

const TEST_DIRS: &[&str] = &["test", "tests", "__tests__", "spec", "specs", "e2e"];

const CI_FILES: &[&str] = &[
    ".gitlab-ci.yml",
    ".travis.yml",
    "azure-pipelines.yml",
    "Jenkinsfile",
    "bitbucket-pipelines.yml",
];

const CI_DIRS: &[&str] = &[".github/workflows/", ".circleci/", ".buildkite/"];

const LINT_FILES: &[&str] = &[
    ".editorconfig",
    "rustfmt.toml",
    ".rustfmt.toml",
    "clippy.toml",
    ".flake8",
    ".pylintrc",
    "ruff.toml",
    ".rubocop.yml",
    ".golangci.yml",
    ".golangci.yaml",
    "biome.json",
    ".stylelintrc",
];

const LINT_PREFIXES: &[&str] = &[".eslintrc", "eslint.config.", ".prettierrc", "prettier.config."];

const TYPE_CHECK_FILES: &[&str] = &[
    "tsconfig.json",
    "jsconfig.json",
    "mypy.ini",
    ".mypy.ini",
    "pyrightconfig.json",
    "py.typed",
];

const LOCKFILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "Cargo.lock",
    "poetry.lock",
    "Pipfile.lock",
    "uv.lock",
    "go.sum",
    "Gemfile.lock",
    "composer.lock",
];

static GEM_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*gem\s+['"]([^'"]+)['"]"#).unwrap());

/// Per-language totals, keyed by file extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageStat {
    pub language: String,
    pub files: usize,
    pub bytes: usize,
    /// Share of recognised bytes, rounded to one decimal place
    pub percentage: f64,
}

/// Top-level directory with its file count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDirectory {
    pub name: String,
    pub file_count: usize,
    pub bytes: usize,
    /// Whether the name is one of the policy's important source directories
    pub source_dir: bool,
}

/// Project hygiene indicators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualitySignals {
    pub has_readme: bool,
    pub has_license: bool,
    pub has_tests: bool,
    pub has_ci: bool,
    pub has_container: bool,
    pub has_lint_config: bool,
    pub has_type_checking: bool,
    pub has_lockfile: bool,
}

impl QualitySignals {
    /// Number of signals tracked.
    pub const MAX_SCORE: usize = 8;

    /// Number of signals present.
    #[must_use]
    pub fn score(&self) -> usize {
        [
            self.has_readme,
            self.has_license,
            self.has_tests,
            self.has_ci,
            self.has_container,
            self.has_lint_config,
            self.has_type_checking,
            self.has_lockfile,
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

fn language_for(ext: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, name)| *name)
}

#[allow(clippy::cast_precision_loss)]
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let (part, whole) = (part as u128, whole as u128);
    let tenths = (part * 1000 + whole / 2) / whole;
    tenths as f64 / 10.0
}

/// Language breakdown by extension, largest first.
///
/// Files with unrecognised extensions are ignored, so percentages are shares
/// of recognised bytes. Ties on bytes sort by language name.
#[must_use]
pub fn detect_languages(files: &[FileRecord]) -> Vec<LanguageStat> {
    let mut totals: HashMap<&'static str, (usize, usize)> = HashMap::new();
    for file in files {
        let Some(language) = file.extension().as_deref().and_then(language_for) else {
            continue;
        };
        let entry = totals.entry(language).or_default();
        entry.0 += 1;
        entry.1 += file.size;
    }

    let recognised: usize = totals.values().map(|(_, bytes)| bytes).sum();
    let mut stats: Vec<LanguageStat> = totals
        .into_iter()
        .map(|(language, (files, bytes))| LanguageStat {
            language: language.to_string(),
            files,
            bytes,
            percentage: percentage(bytes, recognised),
        })
        .collect();

    stats.sort_by(|a, b| {
        b.bytes
            .cmp(&a.bytes)
            .then_with(|| a.language.cmp(&b.language))
    });
    stats
}

/// Frameworks named by dependency manifests anywhere in the file set.
///
/// Sorted and deduplicated.
#[must_use]
pub fn detect_frameworks(files: &[FileRecord]) -> Vec<String> {
    let mut found = BTreeSet::new();

    for file in files {
        for dependency in manifest_dependencies(file) {
            for (marker, framework) in FRAMEWORKS {
                let is_match = dependency == *marker
                    || (marker.contains('/') && dependency.starts_with(&format!("{marker}/")));
                if is_match {
                    found.insert((*framework).to_string());
                }
            }
        }
    }

    found.into_iter().collect()
}

fn manifest_dependencies(file: &FileRecord) -> Vec<String> {
    let content = file.content.as_str();
    let dependencies = match file.file_name() {
        "package.json" => json_keys(
            content,
            &["dependencies", "devDependencies", "peerDependencies"],
        ),
        "composer.json" => json_keys(content, &["require", "require-dev"]),
        "Cargo.toml" => cargo_dependencies(content),
        "pyproject.toml" => pyproject_dependencies(content),
        "requirements.txt" => content.lines().filter_map(requirement_name).collect(),
        "go.mod" => go_requirements(content),
        "Gemfile" => GEM_LINE
            .captures_iter(content)
            .map(|caps| caps[1].to_string())
            .collect(),
        _ => return Vec::new(),
    };

    debug!(
        path = %file.path,
        count = dependencies.len(),
        "Read manifest dependencies"
    );
    dependencies
}

fn json_keys(content: &str, sections: &[&str]) -> Vec<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(content) else {
        return Vec::new();
    };
    sections
        .iter()
        .filter_map(|section| value.get(section).and_then(serde_json::Value::as_object))
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

fn table_keys(table: Option<&toml::Value>) -> impl Iterator<Item = String> + '_ {
    table
        .and_then(toml::Value::as_table)
        .into_iter()
        .flat_map(|t| t.keys().cloned())
}

fn cargo_dependencies(content: &str) -> Vec<String> {
    let Ok(manifest) = content.parse::<toml::Table>() else {
        return Vec::new();
    };
    let workspace = manifest
        .get("workspace")
        .and_then(|ws| ws.get("dependencies"));

    table_keys(manifest.get("dependencies"))
        .chain(table_keys(manifest.get("dev-dependencies")))
        .chain(table_keys(manifest.get("build-dependencies")))
        .chain(table_keys(workspace))
        .collect()
}

fn pyproject_dependencies(content: &str) -> Vec<String> {
    let Ok(manifest) = content.parse::<toml::Table>() else {
        return Vec::new();
    };

    let mut names: Vec<String> = manifest
        .get("project")
        .and_then(|project| project.get("dependencies"))
        .and_then(toml::Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(toml::Value::as_str)
        .filter_map(requirement_name)
        .collect();

    let poetry = manifest
        .get("tool")
        .and_then(|tool| tool.get("poetry"))
        .and_then(|poetry| poetry.get("dependencies"));
    names.extend(table_keys(poetry).map(|name| normalize_python_name(&name)));
    names
}

/// Package name from a requirement specifier (`Django>=4.2 ; python_version>"3"`).
fn requirement_name(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
        return None;
    }
    let end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(line.len());
    let name = &line[..end];
    (!name.is_empty()).then(|| normalize_python_name(name))
}

fn normalize_python_name(name: &str) -> String {
    name.to_ascii_lowercase().replace('_', "-")
}

/// Module paths from `require` lines and blocks.
fn go_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .map(|line| line.strip_prefix("require ").unwrap_or(line).trim())
        .filter_map(|line| line.split_whitespace().next())
        .filter(|token| token.contains('/') && token.contains('.'))
        .map(ToString::to_string)
        .collect()
}

#[derive(Default)]
struct TreeNode<'a> {
    dirs: BTreeMap<&'a str, TreeNode<'a>>,
    files: BTreeSet<&'a str>,
}

impl TreeNode<'_> {
    fn render(&self, depth: usize, max_depth: usize, lines: &mut Vec<String>) {
        if depth >= max_depth {
            return;
        }
        let indent = "  ".repeat(depth);
        for (name, child) in &self.dirs {
            lines.push(format!("{indent}{name}/"));
            child.render(depth + 1, max_depth, lines);
        }
        for name in &self.files {
            lines.push(format!("{indent}{name}"));
        }
    }
}

/// Indented directory tree, directories before files, both alphabetical.
///
/// Levels at or below `max_depth` are not expanded. When more than
/// `max_entries` lines would be shown, the rest collapse into a final
/// `... (N more)` line.
#[must_use]
pub fn render_tree(files: &[FileRecord], max_depth: usize, max_entries: usize) -> String {
    let mut root = TreeNode::default();
    for file in files {
        let mut node = &mut root;
        for segment in file.dir_segments() {
            node = node.dirs.entry(segment).or_default();
        }
        node.files.insert(file.file_name());
    }

    let mut lines = Vec::new();
    root.render(0, max_depth, &mut lines);

    if lines.len() > max_entries {
        let hidden = lines.len() - max_entries;
        lines.truncate(max_entries);
        lines.push(format!("... ({hidden} more)"));
    }
    lines.join("\n")
}

/// Top-level directories, important source directories first, then by
/// descending file count and name.
#[must_use]
pub fn key_directories(
    files: &[FileRecord],
    policy: &SelectionPolicy,
    limit: usize,
) -> Vec<KeyDirectory> {
    let mut dirs: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for file in files {
        if let Some(top) = file.dir_segments().next() {
            let entry = dirs.entry(top).or_default();
            entry.0 += 1;
            entry.1 += file.size;
        }
    }

    let mut ranked: Vec<KeyDirectory> = dirs
        .into_iter()
        .map(|(name, (file_count, bytes))| KeyDirectory {
            name: name.to_string(),
            file_count,
            bytes,
            source_dir: policy.source_dirs.iter().any(|dir| dir == name),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.source_dir
            .cmp(&a.source_dir)
            .then_with(|| b.file_count.cmp(&a.file_count))
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(limit);
    ranked
}

fn is_test_file(file: &FileRecord) -> bool {
    if file.dir_segments().any(|segment| TEST_DIRS.contains(&segment)) {
        return true;
    }
    let name = file.file_name();
    let stem = name.split('.').next().unwrap_or(name);
    name.contains(".test.")
        || name.contains(".spec.")
        || name.starts_with("test_")
        || stem.ends_with("_test")
}

fn is_container_file(name: &str) -> bool {
    name == "Dockerfile"
        || name == "Containerfile"
        || name.starts_with("Dockerfile.")
        || name.starts_with("docker-compose")
        || name == "compose.yml"
        || name == "compose.yaml"
}

/// Hygiene indicators over the full file set.
#[must_use]
pub fn quality_signals(files: &[FileRecord]) -> QualitySignals {
    let mut signals = QualitySignals::default();

    for file in files {
        let name = file.file_name();
        let at_root = file.depth() == 0;

        signals.has_readme |= at_root && name.to_ascii_lowercase().starts_with("readme");
        signals.has_license |= at_root
            && (name.to_ascii_uppercase().starts_with("LICENSE")
                || name.to_ascii_uppercase().starts_with("COPYING"));
        signals.has_tests |= is_test_file(file);
        signals.has_ci |= CI_FILES.contains(&file.path.as_str())
            || CI_DIRS.iter().any(|dir| file.path.starts_with(dir));
        signals.has_container |= is_container_file(name);
        signals.has_lint_config |= LINT_FILES.contains(&name)
            || LINT_PREFIXES.iter().any(|prefix| name.starts_with(prefix));
        signals.has_type_checking |= TYPE_CHECK_FILES.contains(&name);
        signals.has_lockfile |= LOCKFILES.contains(&name);
    }

    signals
}
