//! Response buffer with tail search.
//!
//! Each search covers the bytes appended since the previous search plus
//! `search_depth` bytes before them. A marker inside a large chunk, or one
//! split across chunks, is found without rescanning the whole buffer.

use std::ops::Range;

use super::patterns::PromptMatcher;

/// Buffer for accumulating device output and searching it for a prompt.
#[derive(Debug)]
pub struct PatternBuffer {
    /// The accumulated output buffer.
    buffer: Vec<u8>,

    /// How many already searched bytes are searched again.
    search_depth: usize,

    /// Buffer length at the previous search.
    searched: usize,
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(1024),
            search_depth,
            searched: 0,
        }
    }

    /// Append device output.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Search the unsearched tail of the buffer for a prompt.
    ///
    /// The returned range is relative to the start of the whole buffer.
    pub fn search_tail(&mut self, matcher: &dyn PromptMatcher) -> Option<Range<usize>> {
        let len = self.buffer.len();
        let start = self.searched.min(len).saturating_sub(self.search_depth);
        self.searched = len;
        matcher
            .find_match(&self.buffer[start..])
            .map(|m| (m.start + start)..(m.end + start))
    }

    /// Check if the tail contains a prompt.
    pub fn tail_contains(&mut self, matcher: &dyn PromptMatcher) -> bool {
        self.search_tail(matcher).is_some()
    }

    /// Take ownership of the buffer contents and reset.
    pub fn take(&mut self) -> Vec<u8> {
        self.searched = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.searched = 0;
        self.buffer.clear();
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::LiteralPrompt;

    #[test]
    fn test_basic_extend() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"1 2 + ok");
        assert_eq!(buffer.as_slice(), b"1 2 + ok");
        assert_eq!(buffer.len(), 8);
    }

    #[test]
    fn test_tail_search_offsets_are_absolute() {
        let mut buffer = PatternBuffer::new(20);
        buffer.extend(&[b'x'; 100]);
        buffer.extend(b"\r\n> ");

        let prompt = LiteralPrompt::new("> ");
        assert_eq!(buffer.search_tail(&prompt), Some(102..104));
    }

    #[test]
    fn test_searched_bytes_beyond_depth_are_skipped() {
        let mut buffer = PatternBuffer::new(10);
        let prompt = LiteralPrompt::new("> ");

        buffer.extend(b"1 > 2");
        buffer.extend(&[b'x'; 100]);
        assert_eq!(buffer.search_tail(&prompt), Some(2..4));

        buffer.clear();
        buffer.extend(b"1 > 2");
        buffer.extend(&[b'x'; 100]);
        assert!(buffer.tail_contains(&LiteralPrompt::new("\n> ")));
        buffer.extend(b"yy");
        // Only the new bytes plus ten before them are scanned again.
        assert!(!buffer.tail_contains(&prompt));
    }

    #[test]
    fn test_marker_early_in_chunk_larger_than_depth() {
        let mut buffer = PatternBuffer::new(16);
        let mut chunk = b" ok\r\n> ".to_vec();
        chunk.extend_from_slice(&[b'x'; 300]);
        buffer.extend(&chunk);

        let prompt = LiteralPrompt::new("> ");
        assert_eq!(buffer.search_tail(&prompt), Some(5..7));
    }

    #[test]
    fn test_marker_split_before_full_chunk() {
        let mut buffer = PatternBuffer::default();
        let prompt = LiteralPrompt::new("\n> ");

        buffer.extend(b"ok\r\n");
        assert!(!buffer.tail_contains(&prompt));

        let mut chunk = b"> ".to_vec();
        chunk.resize(256, b'x');
        buffer.extend(&chunk);
        assert_eq!(buffer.search_tail(&prompt), Some(3..6));
    }

    #[test]
    fn test_marker_split_across_extends() {
        let mut buffer = PatternBuffer::default();
        let prompt = LiteralPrompt::new("\n> ");

        buffer.extend(b"ok\r\n");
        assert!(!buffer.tail_contains(&prompt));
        buffer.extend(b">");
        assert!(!buffer.tail_contains(&prompt));
        buffer.extend(b" ");
        assert!(buffer.tail_contains(&prompt));
    }

    #[test]
    fn test_take_clears_buffer() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"test data");
        assert_eq!(buffer.take(), b"test data");
        assert!(buffer.is_empty());
    }
}
