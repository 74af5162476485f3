//! Local filesystem repository source.
//!
//! Walks a checked-out repository and produces the flat list of
//! [`FileRecord`]s the selection core consumes. Everything the core assumes
//! about its input (no binaries, no VCS or build output, no symlinks, bounded
//! depth) is enforced here.

use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use repoglance_config::SourceSettings;
use repoglance_utils::error::SourceError;
use repoglance_utils::types::FileRecord;

/// Bytes sniffed for a NUL byte before a file is treated as binary.
const BINARY_SNIFF_BYTES: usize = 8 * 1024;

/// Counters reported once a walk completes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    pub files: usize,
    pub skipped_binary: usize,
    pub skipped_oversized: usize,
    pub skipped_excluded: usize,
    pub skipped_symlinks: usize,
    pub unreadable: usize,
}

/// Repository source backed by a local directory.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: Utf8PathBuf,
    settings: SourceSettings,
    exclude: GlobSet,
}

impl LocalSource {
    /// Open `root` for walking.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the root is missing, is not a directory,
    /// is not valid UTF-8, or an exclude pattern does not compile.
    pub fn new(root: impl AsRef<Path>, settings: &SourceSettings) -> Result<Self, SourceError> {
        let root = root.as_ref();
        let display = root.display().to_string();

        let root = Utf8PathBuf::try_from(root.to_path_buf())
            .map_err(|_| SourceError::NonUtf8Path { path: display.clone() })?;

        if !root.exists() {
            return Err(SourceError::NotFound { path: display });
        }
        if !root.is_dir() {
            return Err(SourceError::NotADirectory { path: display });
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &settings.exclude {
            let glob = Glob::new(pattern).map_err(|e| SourceError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            builder.add(glob);
        }
        let exclude = builder.build().map_err(|e| SourceError::InvalidPattern {
            pattern: settings.exclude.join(", "),
            reason: e.to_string(),
        })?;

        Ok(Self {
            root,
            settings: settings.clone(),
            exclude,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Walk the repository and return its text files in deterministic order.
    ///
    /// # Errors
    ///
    /// Only the root itself can fail; unreadable entries below it are logged
    /// and skipped.
    pub fn collect(&self) -> Result<Vec<FileRecord>, SourceError> {
        self.collect_with_stats().map(|(files, _)| files)
    }

    /// Like [`LocalSource::collect`], also returning the walk counters.
    ///
    /// # Errors
    ///
    /// See [`LocalSource::collect`].
    pub fn collect_with_stats(&self) -> Result<(Vec<FileRecord>, WalkStats), SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::NotFound {
                path: self.root.to_string(),
            });
        }

        let mut files = Vec::new();
        let mut stats = WalkStats::default();
        self.walk(&self.root, "", 0, &mut files, &mut stats);
        stats.files = files.len();

        info!(
            root = %self.root,
            files = stats.files,
            skipped_binary = stats.skipped_binary,
            skipped_oversized = stats.skipped_oversized,
            skipped_excluded = stats.skipped_excluded,
            "Repository walk complete"
        );

        Ok((files, stats))
    }

    fn walk(
        &self,
        dir: &Utf8Path,
        prefix: &str,
        depth: usize,
        files: &mut Vec<FileRecord>,
        stats: &mut WalkStats,
    ) {
        let mut entries: Vec<fs::DirEntry> = match fs::read_dir(dir) {
            Ok(iter) => iter.filter_map(Result::ok).collect(),
            Err(e) => {
                warn!(dir = %dir, error = %e, "Skipping unreadable directory");
                stats.unreadable += 1;
                return;
            }
        };
        entries.sort_by_key(fs::DirEntry::file_name);

        for entry in entries {
            let Ok(name) = entry.file_name().into_string() else {
                debug!(dir = %dir, "Skipping non UTF-8 entry name");
                stats.unreadable += 1;
                continue;
            };
            let relative = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };

            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!(path = %relative, error = %e, "Skipping entry with unreadable type");
                    stats.unreadable += 1;
                    continue;
                }
            };

            if file_type.is_symlink() {
                stats.skipped_symlinks += 1;
                continue;
            }

            if self.exclude.is_match(&relative) {
                debug!(path = %relative, "Excluded by pattern");
                stats.skipped_excluded += 1;
                continue;
            }

            let path = dir.join(&name);
            if file_type.is_dir() {
                if self.settings.skip_dirs.iter().any(|skip| *skip == name) {
                    continue;
                }
                if depth + 1 > self.settings.max_depth {
                    debug!(path = %relative, "Maximum depth reached");
                    continue;
                }
                self.walk(&path, &relative, depth + 1, files, stats);
            } else if file_type.is_file()
                && let Some(record) = self.read_file(&path, relative, stats)
            {
                files.push(record);
            }
        }
    }

    fn read_file(
        &self,
        path: &Utf8Path,
        relative: String,
        stats: &mut WalkStats,
    ) -> Option<FileRecord> {
        if let Some(ext) = path.extension() {
            let ext = ext.to_ascii_lowercase();
            if self.settings.binary_extensions.iter().any(|b| *b == ext) {
                stats.skipped_binary += 1;
                return None;
            }
        }

        let len = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!(path = %relative, error = %e, "Skipping file with unreadable metadata");
                stats.unreadable += 1;
                return None;
            }
        };
        if len > self.settings.max_file_bytes {
            debug!(path = %relative, bytes = len, "Skipping oversized file");
            stats.skipped_oversized += 1;
            return None;
        }

        let mut bytes = Vec::new();
        if let Err(e) = fs::File::open(path).and_then(|mut f| f.read_to_end(&mut bytes)) {
            warn!(path = %relative, error = %e, "Skipping unreadable file");
            stats.unreadable += 1;
            return None;
        }

        if looks_binary(&bytes) {
            stats.skipped_binary += 1;
            return None;
        }

        let content = String::from_utf8_lossy(&bytes).into_owned();
        Some(FileRecord::new(relative, content))
    }
}

/// A NUL byte near the start of a file marks it as binary.
fn looks_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_SNIFF_BYTES).any(|b| *b == 0)
}
