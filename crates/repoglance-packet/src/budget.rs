use std::collections::HashSet;
use tracing::{debug, info, warn};

use repoglance_utils::types::FileRecord;

/// Outcome of offering one candidate to a [`SelectionBudget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Appended unchanged
    Appended,
    /// Over the per-file cap; a truncated copy was appended
    Truncated,
    /// Path was already selected by an earlier tier
    AlreadySelected,
    /// Would have pushed the total past the aggregate cap; the run is now halted
    Rejected,
    /// The run had already halted
    Halted,
}

impl Admission {
    /// Whether the candidate ended up in the selection.
    #[must_use]
    pub const fn is_selected(self) -> bool {
        matches!(self, Self::Appended | Self::Truncated)
    }
}

/// Running-size accounting for one selection run.
///
/// `total_size` always equals the sum of `selected[i].size`. Once a
/// candidate is rejected the budget is halted and admits nothing else.
#[derive(Debug, Clone)]
pub struct SelectionBudget {
    max_file_bytes: usize,
    max_total_bytes: usize,
    total_size: usize,
    selected: Vec<FileRecord>,
    paths: HashSet<String>,
    halted: bool,
}

impl SelectionBudget {
    #[must_use]
    pub fn new(max_file_bytes: usize, max_total_bytes: usize) -> Self {
        Self {
            max_file_bytes,
            max_total_bytes,
            total_size: 0,
            selected: Vec::new(),
            paths: HashSet::new(),
            halted: false,
        }
    }

    /// Offer a candidate.
    ///
    /// Files over the per-file cap are truncated and always appended, even
    /// when the copy alone overflows what is left of the aggregate cap. The
    /// overflow is only observed by the next candidate, which halts the run.
    pub fn commit(&mut self, file: &FileRecord, truncation_marker: &str) -> Admission {
        if self.halted {
            return Admission::Halted;
        }
        if self.paths.contains(&file.path) {
            return Admission::AlreadySelected;
        }
        if self.total_size > self.max_total_bytes {
            info!(
                path = %file.path,
                total_size = self.total_size,
                "Aggregate cap already exceeded, halting selection"
            );
            self.halted = true;
            return Admission::Halted;
        }

        if file.size > self.max_file_bytes {
            let copy = file.truncated_copy(self.max_file_bytes, truncation_marker);
            warn!(
                path = %file.path,
                original_size = file.size,
                truncated_size = copy.size,
                "Truncated file to per-file cap"
            );
            self.push(copy);
            return Admission::Truncated;
        }

        if self.total_size + file.size > self.max_total_bytes {
            info!(
                path = %file.path,
                size = file.size,
                total_size = self.total_size,
                max_total_bytes = self.max_total_bytes,
                "Candidate exceeds aggregate cap, halting selection"
            );
            self.halted = true;
            return Admission::Rejected;
        }

        debug!(path = %file.path, size = file.size, "Selected file");
        self.push(file.clone());
        Admission::Appended
    }

    fn push(&mut self, file: FileRecord) {
        self.total_size += file.size;
        self.paths.insert(file.path.clone());
        self.selected.push(file);
    }

    #[must_use]
    pub const fn total_size(&self) -> usize {
        self.total_size
    }

    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    #[must_use]
    pub fn selected(&self) -> &[FileRecord] {
        &self.selected
    }

    #[must_use]
    pub fn into_selected(self) -> Vec<FileRecord> {
        self.selected
    }
}
