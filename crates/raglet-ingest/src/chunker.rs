//! Sliding-window text chunker.

/// Splits text into fixed-size chunks with overlap between neighbours.
///
/// Sizes are in characters, not bytes, so multi-byte input never splits
/// inside a code point.
#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    /// An overlap of at least `chunk_size` would never advance; it is
    /// clamped to `chunk_size - 1` so chunking always terminates.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    pub fn chunk(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start = end - self.overlap;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(Chunker::new(1000, 200).chunk("").is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = Chunker::new(1000, 200).chunk("hello world");
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn chunks_overlap_by_configured_amount() {
        let text = "abcdefghij"; // 10 chars
        let chunks = Chunker::new(4, 2).chunk(text);
        assert_eq!(chunks, vec!["abcd", "cdef", "efgh", "ghij"]);
    }

    #[test]
    fn covers_full_text() {
        let text: String = std::iter::repeat('x').take(2500).collect();
        let chunks = Chunker::new(1000, 200).chunk(&text);
        let total: usize = chunks.iter().map(|c| c.chars().count()).sum();
        // 2500 chars with 200 overlap between neighbours
        assert!(chunks.len() >= 3);
        assert!(total >= 2500);
        assert!(chunks.iter().all(|c| c.chars().count() <= 1000));
    }

    #[test]
    fn overlap_ge_size_still_terminates() {
        let chunks = Chunker::new(4, 10).chunk("abcdefgh");
        assert!(!chunks.is_empty());
        assert_eq!(chunks[0], "abcd");
    }

    #[test]
    fn multibyte_input_splits_on_char_boundaries() {
        let text = "日本語のテキストです";
        let chunks = Chunker::new(3, 1).chunk(text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 3));
        assert_eq!(chunks[0], "日本語");
    }
}
