//! Fixture builders shared by unit and integration tests.

use crate::types::FileRecord;

/// A record whose content is `size` copies of `fill`.
#[must_use]
pub fn sized_file(path: &str, size: usize, fill: char) -> FileRecord {
    FileRecord::new(path, fill.to_string().repeat(size))
}

/// A small record with a recognizable body.
#[must_use]
pub fn text_file(path: &str) -> FileRecord {
    FileRecord::new(path, format!("// contents of {path}\n"))
}

/// Records for every path, each `size` bytes of `x`.
#[must_use]
pub fn uniform_files(paths: &[&str], size: usize) -> Vec<FileRecord> {
    paths.iter().map(|p| sized_file(p, size, 'x')).collect()
}

/// A small but representative web project layout.
#[must_use]
pub fn sample_web_repo() -> Vec<FileRecord> {
    vec![
        FileRecord::new("README.md", "# Demo\n\nA demo service.\n"),
        FileRecord::new("LICENSE", "MIT License\n"),
        FileRecord::new(
            "package.json",
            r#"{"name":"demo","dependencies":{"react":"^18.0.0","express":"^4.18.0"}}"#,
        ),
        FileRecord::new("tsconfig.json", "{\"compilerOptions\":{}}\n"),
        FileRecord::new("Dockerfile", "FROM node:20\n"),
        FileRecord::new("index.js", "require('./src/server');\n"),
        FileRecord::new("src/server.ts", "export const start = () => {};\n"),
        FileRecord::new("src/app/index.js", "export default {};\n"),
        FileRecord::new("src/components/Button.tsx", "export const Button = () => null;\n"),
        FileRecord::new("lib/util.js", "module.exports = {};\n"),
        FileRecord::new("tests/server.test.js", "test('ok', () => {});\n"),
        FileRecord::new(".github/workflows/ci.yml", "on: push\n"),
        FileRecord::new("notes.txt", "misc\n"),
    ]
}
