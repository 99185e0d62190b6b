use serde::{Deserialize, Serialize};

/// Configuration for code chunking behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Chunking strategy to use
    pub strategy: ChunkingStrategy,

    /// Maximum chunk size in tokens (files at or below this are sent whole)
    pub max_chunk_tokens: usize,

    /// Lines per chunk when cutting by line count
    pub fallback_chunk_lines: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            strategy: ChunkingStrategy::Semantic,
            max_chunk_tokens: 3000,
            fallback_chunk_lines: 120,
        }
    }
}

impl ChunkerConfig {
    /// Create config for models with a small context window
    pub fn for_small_models() -> Self {
        Self {
            max_chunk_tokens: 1024,
            fallback_chunk_lines: 60,
            ..Default::default()
        }
    }

    /// Create config optimized for speed (no parsing, plain line cuts)
    pub fn for_speed() -> Self {
        Self {
            strategy: ChunkingStrategy::LineCount,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_tokens == 0 {
            return Err("max_chunk_tokens must be > 0".to_string());
        }

        if self.fallback_chunk_lines == 0 {
            return Err("fallback_chunk_lines must be > 0".to_string());
        }

        Ok(())
    }
}

/// Strategy for chunking code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkingStrategy {
    /// Split at syntactic unit edges (top-level statements, definitions)
    Semantic,

    /// Fixed line count chunking (simpler, faster)
    LineCount,
}

impl std::str::FromStr for ChunkingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "semantic" => Ok(Self::Semantic),
            "line-count" | "line_count" | "lines" => Ok(Self::LineCount),
            other => Err(format!("unknown chunking strategy '{other}'")),
        }
    }
}
