//! Shared data types passed between the repository source, the selection
//! core and the analysis engine.

use serde::{Deserialize, Serialize};

/// One file from the repository.
///
/// `path` is slash-separated and relative to the repository root. `size` is
/// the byte length of `content` as fetched and is treated as authoritative:
/// a source may have shortened `content` before handing the record over.
///
/// Records are never mutated once built. The selector derives truncated
/// copies instead (see [`FileRecord::truncated_copy`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub content: String,
    pub size: usize,
}

impl FileRecord {
    /// Build a record whose size is the byte length of `content`.
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            size: content.len(),
            content,
        }
    }

    /// Build a record with an explicit size, as reported by the source.
    #[must_use]
    pub fn with_size(path: impl Into<String>, content: impl Into<String>, size: usize) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            size,
        }
    }

    /// Final path segment (`src/lib/index.js` -> `index.js`).
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Number of `/` separators in the path. Root-level files have depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.bytes().filter(|b| *b == b'/').count()
    }

    /// Directory segments leading to the file, excluding the file name.
    pub fn dir_segments(&self) -> impl Iterator<Item = &str> {
        let dir = self.path.rsplit_once('/').map_or("", |(dir, _)| dir);
        dir.split('/').filter(|segment| !segment.is_empty())
    }

    /// Lower-cased extension of the file name, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                Some(ext.to_ascii_lowercase())
            }
            _ => None,
        }
    }

    /// Derive a copy holding at most `max_bytes` of content followed by `marker`.
    ///
    /// The cut lands on the closest UTF-8 character boundary at or below
    /// `max_bytes`. The copy's size is its new content length, marker included.
    #[must_use]
    pub fn truncated_copy(&self, max_bytes: usize, marker: &str) -> Self {
        let mut cut = max_bytes.min(self.content.len());
        while !self.content.is_char_boundary(cut) {
            cut -= 1;
        }

        let mut content = String::with_capacity(cut + marker.len());
        content.push_str(&self.content[..cut]);
        content.push_str(marker);

        Self {
            path: self.path.clone(),
            size: content.len(),
            content,
        }
    }
}

/// Source of a configuration value, used for attribution in `config` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Value provided via CLI argument (highest precedence).
    Cli,
    /// Value loaded from configuration file.
    Config,
    /// Value provided programmatically (e.g., `Config::builder()`).
    Programmatic,
    /// Built-in default value (lowest precedence).
    Default,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_and_file_name() {
        let root = FileRecord::new("index.js", "");
        let nested = FileRecord::new("src/app/index.js", "");

        assert_eq!(root.depth(), 0);
        assert_eq!(nested.depth(), 2);
        assert_eq!(nested.file_name(), "index.js");
        assert_eq!(nested.dir_segments().collect::<Vec<_>>(), vec!["src", "app"]);
        assert_eq!(root.dir_segments().count(), 0);
    }

    #[test]
    fn test_extension_handles_dotfiles() {
        assert_eq!(FileRecord::new("a/b.RS", "").extension().as_deref(), Some("rs"));
        assert_eq!(FileRecord::new(".gitignore", "").extension(), None);
        assert_eq!(FileRecord::new("Makefile", "").extension(), None);
    }

    #[test]
    fn test_truncated_copy_appends_marker_and_updates_size() {
        let original = FileRecord::new("big.txt", "a".repeat(20));
        let copy = original.truncated_copy(8, "[cut]");

        assert_eq!(copy.content, "aaaaaaaa[cut]");
        assert_eq!(copy.size, 13);
        assert_eq!(original.size, 20, "original must stay untouched");
    }

    #[test]
    fn test_truncated_copy_respects_char_boundaries() {
        // 'é' is two bytes; a cut at byte 3 would split the second one.
        let original = FileRecord::new("utf8.txt", "éé");
        let copy = original.truncated_copy(3, "!");

        assert_eq!(copy.content, "é!");
        assert_eq!(copy.size, 3);
    }
}
