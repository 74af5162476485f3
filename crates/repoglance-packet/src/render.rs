use repoglance_utils::types::FileRecord;

/// Opening delimiter of a file header line.
pub const FILE_HEADER_PREFIX: &str = "=== ";

/// Closing delimiter of a file header line.
pub const FILE_HEADER_SUFFIX: &str = " ===";

/// Byte length of the block [`render_file_block`] would produce.
#[must_use]
pub fn rendered_len(file: &FileRecord) -> usize {
    FILE_HEADER_PREFIX.len()
        + file.path.len()
        + FILE_HEADER_SUFFIX.len()
        + 1
        + file.content.len()
        + 2
}

/// Render one file as `=== <path> ===\n<content>\n\n`.
#[must_use]
pub fn render_file_block(file: &FileRecord) -> String {
    let mut block = String::with_capacity(rendered_len(file));
    push_file_block(&mut block, file);
    block
}

/// Append the rendered block for `file` to `buffer`.
pub(crate) fn push_file_block(buffer: &mut String, file: &FileRecord) {
    buffer.push_str(FILE_HEADER_PREFIX);
    buffer.push_str(&file.path);
    buffer.push_str(FILE_HEADER_SUFFIX);
    buffer.push('\n');
    buffer.push_str(&file.content);
    buffer.push_str("\n\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_format() {
        let file = FileRecord::new("src/lib.rs", "pub fn x() {}");
        let block = render_file_block(&file);

        assert_eq!(block, "=== src/lib.rs ===\npub fn x() {}\n\n");
        assert_eq!(block.len(), rendered_len(&file));
    }

    #[test]
    fn test_empty_content_still_has_header() {
        let file = FileRecord::new("empty.txt", "");
        assert_eq!(render_file_block(&file), "=== empty.txt ===\n\n\n");
    }
}
