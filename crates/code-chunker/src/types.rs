use serde::{Deserialize, Serialize};

/// A contiguous slice of a file submitted as one analysis unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeChunk {
    /// The actual code content
    pub code: String,

    /// Start line (1-indexed) of the chunk's first line in the original file
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Position of this chunk in the file (0-indexed)
    pub index: usize,

    /// Number of chunks the file was split into
    pub total: usize,
}

impl CodeChunk {
    /// Create a new code chunk; `index`/`total` are assigned once the file is fully split
    #[must_use]
    pub const fn new(code: String, start_line: usize, end_line: usize) -> Self {
        Self {
            code,
            start_line,
            end_line,
            index: 0,
            total: 1,
        }
    }

    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Get estimated token count
    #[must_use]
    pub fn estimated_tokens(&self) -> usize {
        estimate_tokens(&self.code)
    }

    /// Human-readable position, e.g. `chunk 2/3`
    #[must_use]
    pub fn label(&self) -> String {
        format!("chunk {}/{}", self.index + 1, self.total)
    }
}

/// Estimate tokens from content (rough heuristic: 4 chars per token for code)
#[must_use]
pub fn estimate_tokens(content: &str) -> usize {
    (content.len() / 4).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_line_count() {
        let chunk = CodeChunk::new("code".to_string(), 10, 15);
        assert_eq!(chunk.line_count(), 6);
    }

    #[test]
    fn test_chunk_label() {
        let mut chunk = CodeChunk::new("x".to_string(), 1, 1);
        chunk.index = 1;
        chunk.total = 3;
        assert_eq!(chunk.label(), "chunk 2/3");
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 1);
        assert_eq!(estimate_tokens("abcdefgh"), 2);
        let content = "def main():\n    print('Hello')\n";
        let tokens = estimate_tokens(content);
        assert!(tokens > 0);
        assert!(tokens < 100);
    }
}
