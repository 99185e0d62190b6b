use crate::boundary::BoundaryFinder;
use crate::config::{ChunkerConfig, ChunkingStrategy};
use crate::error::{ChunkerError, Result};
use crate::language::FileType;
use crate::strategy::{LineIndex, StrategyExecutor};
use crate::types::{estimate_tokens, CodeChunk};

/// Main chunker interface for processing code
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a new chunker with configuration
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate().map_err(ChunkerError::invalid_config)?;
        Ok(Self { config })
    }

    /// Split `content` into ordered, non-overlapping chunks covering every line.
    ///
    /// Content that fits within `max_chunk_tokens` comes back as a single chunk
    /// starting at line 1.
    pub fn chunk(&self, content: &str, file_type: FileType) -> Result<Vec<CodeChunk>> {
        let index = LineIndex::new(content);

        if estimate_tokens(content) <= self.config.max_chunk_tokens {
            let chunk = CodeChunk::new(content.to_string(), 1, index.len().max(1));
            return Ok(vec![chunk]);
        }

        let boundaries = match self.config.strategy {
            ChunkingStrategy::Semantic => match self.find_boundaries(content, file_type) {
                Ok(boundaries) => boundaries,
                Err(e) => {
                    log::warn!(
                        "{file_type} boundary detection failed, falling back to line count: {e}"
                    );
                    return Ok(self.chunk_by_lines(&index));
                }
            },
            ChunkingStrategy::LineCount => Vec::new(),
        };

        let executor = StrategyExecutor::new(self.config.clone());
        let ranges = executor.execute(&index, &boundaries);
        Ok(Self::finish(&index, ranges))
    }

    fn find_boundaries(&self, content: &str, file_type: FileType) -> Result<Vec<usize>> {
        let mut finder = BoundaryFinder::new(file_type)?;
        finder.find(content)
    }

    fn chunk_by_lines(&self, index: &LineIndex<'_>) -> Vec<CodeChunk> {
        let executor = StrategyExecutor::new(self.config.clone());
        let ranges = executor.chunk_by_lines(index, 0..index.len());
        Self::finish(index, ranges)
    }

    /// Materialize line ranges into chunks and number them
    fn finish(index: &LineIndex<'_>, ranges: Vec<std::ops::Range<usize>>) -> Vec<CodeChunk> {
        let total = ranges.len();
        ranges
            .into_iter()
            .enumerate()
            .map(|(i, range)| {
                let mut chunk = CodeChunk::new(
                    index.text(range.clone()).to_string(),
                    range.start + 1,
                    range.end.max(range.start + 1),
                );
                chunk.index = i;
                chunk.total = total;
                chunk
            })
            .collect()
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Get statistics about chunking
    #[must_use]
    pub fn get_stats(chunks: &[CodeChunk]) -> ChunkingStats {
        let tokens = || chunks.iter().map(CodeChunk::estimated_tokens);
        ChunkingStats {
            total_chunks: chunks.len(),
            total_lines: chunks.iter().map(CodeChunk::line_count).sum(),
            total_tokens: tokens().sum(),
            avg_tokens_per_chunk: if chunks.is_empty() {
                0
            } else {
                tokens().sum::<usize>() / chunks.len()
            },
            min_tokens: tokens().min().unwrap_or(0),
            max_tokens: tokens().max().unwrap_or(0),
        }
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            config: ChunkerConfig::default(),
        }
    }
}

/// Statistics about chunking results
#[derive(Debug, Clone)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub total_lines: usize,
    pub total_tokens: usize,
    pub avg_tokens_per_chunk: usize,
    pub min_tokens: usize,
    pub max_tokens: usize,
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} | Lines: {} | Tokens: {} | Avg: {} | Range: {}-{}",
            self.total_chunks,
            self.total_lines,
            self.total_tokens,
            self.avg_tokens_per_chunk,
            self.min_tokens,
            self.max_tokens
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PYTHON_CODE: &str = r#"import os

def read_config(path):
    f = open(path)
    return f.read()

class Store:
    def __init__(self):
        self.items = []

    def add(self, item):
        self.items.append(item)
"#;

    fn small_chunker(strategy: ChunkingStrategy) -> Chunker {
        Chunker::new(ChunkerConfig {
            strategy,
            max_chunk_tokens: 25,
            fallback_chunk_lines: 4,
        })
        .unwrap()
    }

    fn assert_covers(content: &str, chunks: &[CodeChunk]) {
        let joined: String = chunks.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(joined, content);

        let mut expected_start = 1;
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(chunk.total, chunks.len());
            assert_eq!(chunk.start_line, expected_start);
            expected_start = chunk.end_line + 1;
        }
    }

    #[test]
    fn test_small_file_is_single_chunk() {
        let chunker = Chunker::default();
        let chunks = chunker.chunk(PYTHON_CODE, FileType::Python).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].end_line, 12);
        assert_eq!(chunks[0].code, PYTHON_CODE);
        assert_eq!(chunks[0].total, 1);
    }

    #[test]
    fn test_empty_content_is_single_empty_chunk() {
        let chunks = Chunker::default().chunk("", FileType::Sql).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].code, "");
        assert_eq!(chunks[0].start_line, 1);
    }

    #[test]
    fn test_semantic_python_chunks_follow_definitions() {
        let chunker = small_chunker(ChunkingStrategy::Semantic);
        let chunks = chunker.chunk(PYTHON_CODE, FileType::Python).unwrap();

        assert!(chunks.len() > 1);
        assert_covers(PYTHON_CODE, &chunks);
        assert!(chunks[0].code.contains("def read_config"));
        assert!(chunks.iter().any(|c| c.code.starts_with("class Store")));
        assert!(chunks.iter().all(|c| c.estimated_tokens() <= 25));
    }

    #[test]
    fn test_semantic_sql_chunks_follow_statements() {
        let sql = "DELETE FROM audit_log;\nTRUNCATE TABLE sessions;\nSELECT *\nFROM orders\nWHERE total > 100;\nDROP TABLE tmp_orders;\n";
        let chunker = small_chunker(ChunkingStrategy::Semantic);
        let chunks = chunker.chunk(sql, FileType::Sql).unwrap();

        assert!(chunks.len() > 1);
        assert_covers(sql, &chunks);
        for chunk in &chunks {
            assert!(
                chunk.code.trim_end().ends_with(';'),
                "chunk cut mid-statement: {:?}",
                chunk.code
            );
        }
    }

    #[test]
    fn test_line_count_strategy() {
        let chunker = small_chunker(ChunkingStrategy::LineCount);
        let chunks = chunker.chunk(PYTHON_CODE, FileType::Python).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_covers(PYTHON_CODE, &chunks);
        assert_eq!(
            chunks.iter().map(|c| c.start_line).collect::<Vec<_>>(),
            vec![1, 5, 9]
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Chunker::new(ChunkerConfig {
            max_chunk_tokens: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(ChunkerError::InvalidConfig(_))));
    }

    #[test]
    fn test_chunking_stats() {
        let chunker = small_chunker(ChunkingStrategy::LineCount);
        let chunks = chunker.chunk(PYTHON_CODE, FileType::Python).unwrap();
        let stats = Chunker::get_stats(&chunks);

        assert_eq!(stats.total_chunks, chunks.len());
        assert_eq!(stats.total_lines, 12);
        assert!(stats.total_tokens > 0);
        assert!(stats.min_tokens <= stats.max_tokens);
        assert!(stats.to_string().starts_with("Chunks: 3"));
    }
}
