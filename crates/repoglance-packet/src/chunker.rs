use tracing::{debug, warn};

use repoglance_config::ChunkPolicy;
use repoglance_utils::logging::log_chunking_complete;
use repoglance_utils::types::FileRecord;

use crate::model::ContentChunk;
use crate::render::{push_file_block, rendered_len};

/// Folds selected files into bounded chunks for the summarizer.
///
/// Files are never split: a block that alone exceeds the ceiling becomes an
/// over-budget chunk of its own.
#[derive(Debug, Clone)]
pub struct Chunker {
    policy: ChunkPolicy,
}

/// Chunk under construction.
#[derive(Default)]
struct ChunkBuffer {
    content: String,
    file_count: usize,
    total_size: usize,
    paths: Vec<String>,
}

impl ChunkBuffer {
    fn is_empty(&self) -> bool {
        self.file_count == 0
    }

    fn push(&mut self, file: &FileRecord) {
        push_file_block(&mut self.content, file);
        self.file_count += 1;
        self.total_size += file.size;
        self.paths.push(file.path.clone());
    }

    fn take(&mut self) -> ContentChunk {
        let buffer = std::mem::take(self);
        ContentChunk {
            content: buffer.content,
            file_count: buffer.file_count,
            total_size: buffer.total_size,
            paths: buffer.paths,
        }
    }
}

impl Chunker {
    #[must_use]
    pub const fn new(policy: ChunkPolicy) -> Self {
        Self { policy }
    }

    /// Chunk ceiling in bytes.
    #[must_use]
    pub const fn ceiling_bytes(&self) -> usize {
        self.policy.ceiling_bytes()
    }

    /// Split `files` into ordered chunks. Empty input yields no chunks.
    #[must_use]
    pub fn chunk(&self, files: &[FileRecord]) -> Vec<ContentChunk> {
        let ceiling = self.ceiling_bytes();
        let mut chunks = Vec::new();
        let mut buffer = ChunkBuffer::default();

        for file in files {
            let block_len = rendered_len(file);
            if !buffer.is_empty() && buffer.content.len() + block_len > ceiling {
                debug!(
                    chunk = chunks.len(),
                    files = buffer.file_count,
                    bytes = buffer.content.len(),
                    "Flushing chunk"
                );
                chunks.push(buffer.take());
            }
            if block_len > ceiling {
                warn!(
                    path = %file.path,
                    bytes = block_len,
                    ceiling,
                    "File exceeds chunk ceiling, emitting over-budget chunk"
                );
            }
            buffer.push(file);
        }

        if !buffer.is_empty() {
            chunks.push(buffer.take());
        }

        log_chunking_complete(chunks.len(), files.len());
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repoglance_utils::test_support::{sized_file, uniform_files};

    fn chunker(max_tokens: usize, chars_per_token: usize) -> Chunker {
        Chunker::new(ChunkPolicy {
            max_tokens,
            chars_per_token,
        })
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(Chunker::new(ChunkPolicy::default()).chunk(&[]).is_empty());
    }

    #[test]
    fn test_three_ten_kb_files_with_25kb_ceiling() {
        let files = uniform_files(&["a.txt", "b.txt", "c.txt"], 10_000);
        let chunks = chunker(25_000, 1).chunk(&files);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].paths, vec!["a.txt", "b.txt"]);
        assert_eq!(chunks[0].total_size, 20_000);
        assert_eq!(chunks[1].paths, vec!["c.txt"]);
        assert_eq!(chunks[1].file_count, 1);
    }

    #[test]
    fn test_single_oversized_file_is_one_chunk() {
        let files = vec![sized_file("huge.txt", 50_000, 'h')];
        let chunks = chunker(100, 4).chunk(&files);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].file_count, 1);
        assert!(chunks[0].content.starts_with("=== huge.txt ===\n"));
    }

    #[test]
    fn test_oversized_file_between_small_ones_stands_alone() {
        let files = vec![
            sized_file("a", 10, 'a'),
            sized_file("big", 1_000, 'b'),
            sized_file("c", 10, 'c'),
        ];
        let chunks = chunker(100, 1).chunk(&files);

        let layout: Vec<Vec<String>> = chunks.iter().map(|c| c.paths.clone()).collect();
        assert_eq!(layout, vec![vec!["a"], vec!["big"], vec!["c"]]);
    }

    #[test]
    fn test_total_size_uses_recorded_sizes() {
        let files = vec![FileRecord::with_size("short.txt", "abc", 9_999)];
        let chunks = Chunker::new(ChunkPolicy::default()).chunk(&files);

        assert_eq!(chunks[0].total_size, 9_999);
        assert_eq!(chunks[0].content, "=== short.txt ===\nabc\n\n");
    }

    #[test]
    fn test_block_exactly_at_ceiling_fits() {
        // "=== a ===\n" + 5 bytes + "\n\n" = 17 bytes per block.
        let files = uniform_files(&["a", "b"], 5);
        let chunks = chunker(34, 1).chunk(&files);
        assert_eq!(chunks.len(), 1);

        let chunks = chunker(33, 1).chunk(&files);
        assert_eq!(chunks.len(), 2);
    }
}
