use blake3::Hasher;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selection tiers, in the order they are scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// README, LICENSE and similar documentation
    Documentation,
    /// Build, lint, format, container and environment configuration
    Configuration,
    /// `index.*`, `main.*`, `app.*`, `server.*`
    EntryPoint,
    /// Files below an important source directory
    SourceDirectory,
    /// Shallow files pulled in when the tiers found too little
    Fallback,
}

impl Tier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Documentation => "documentation",
            Self::Configuration => "configuration",
            Self::EntryPoint => "entry_point",
            Self::SourceDirectory => "source_directory",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of work for the summarizer.
///
/// `total_size` sums the recorded `size` of the files folded in, not the
/// rendered length of `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentChunk {
    /// Rendered file blocks, in selection order
    pub content: String,
    pub file_count: usize,
    pub total_size: usize,
    /// Paths of the files in this chunk, in order
    pub paths: Vec<String>,
}

impl ContentChunk {
    /// BLAKE3 hash of the rendered content, hex encoded.
    #[must_use]
    pub fn blake3_hash(&self) -> String {
        let mut hasher = Hasher::new();
        hasher.update(self.content.as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    /// Byte length of the rendered content.
    #[must_use]
    pub fn rendered_len(&self) -> usize {
        self.content.len()
    }
}
