use crate::config::{ChunkerConfig, ChunkingStrategy};
use crate::types::estimate_tokens;
use std::ops::Range;

/// Line-indexed view over file content. Every line keeps its terminator so that
/// concatenating consecutive ranges reproduces the original text exactly.
pub struct LineIndex<'a> {
    content: &'a str,
    offsets: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(content: &'a str) -> Self {
        let mut offsets = Vec::with_capacity(content.len() / 32 + 2);
        offsets.push(0);
        let mut pos = 0;
        for line in content.split_inclusive('\n') {
            pos += line.len();
            offsets.push(pos);
        }
        Self { content, offsets }
    }

    /// Number of lines in the content
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text of the half-open line range
    pub fn text(&self, lines: Range<usize>) -> &'a str {
        &self.content[self.offsets[lines.start]..self.offsets[lines.end]]
    }

    /// Estimated tokens of the half-open line range
    pub fn tokens(&self, lines: Range<usize>) -> usize {
        estimate_tokens(self.text(lines))
    }
}

/// Turn unit boundaries into packed line ranges according to the configured strategy
pub struct StrategyExecutor {
    config: ChunkerConfig,
}

impl StrategyExecutor {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Execute the configured strategy. `boundaries` is only used by the
    /// semantic strategy.
    pub fn execute(&self, index: &LineIndex<'_>, boundaries: &[usize]) -> Vec<Range<usize>> {
        match self.config.strategy {
            ChunkingStrategy::LineCount => self.chunk_by_lines(index, 0..index.len()),
            ChunkingStrategy::Semantic => self.pack_units(index, boundaries),
        }
    }

    /// Simple line-based chunking
    pub fn chunk_by_lines(&self, index: &LineIndex<'_>, lines: Range<usize>) -> Vec<Range<usize>> {
        let step = self.config.fallback_chunk_lines.max(1);
        let mut ranges = Vec::new();
        let mut start = lines.start;

        while start < lines.end {
            let end = (start + step).min(lines.end);
            ranges.push(start..end);
            start = end;
        }

        if ranges.is_empty() && index.is_empty() {
            ranges.push(0..0);
        }
        ranges
    }

    /// Greedily pack consecutive units into ranges under the token limit
    fn pack_units(&self, index: &LineIndex<'_>, boundaries: &[usize]) -> Vec<Range<usize>> {
        let max_tokens = self.config.max_chunk_tokens;
        let mut ranges: Vec<Range<usize>> = Vec::new();
        let mut current: Option<Range<usize>> = None;

        for unit in units(boundaries, index.len()) {
            if index.tokens(unit.clone()) > max_tokens {
                if let Some(open) = current.take() {
                    ranges.push(open);
                }
                log::debug!(
                    "unit at lines {}-{} exceeds {max_tokens} tokens; splitting by tokens",
                    unit.start + 1,
                    unit.end
                );
                ranges.extend(self.chunk_by_tokens(index, unit));
                continue;
            }

            current = match current.take() {
                Some(open) if index.tokens(open.start..unit.end) <= max_tokens => {
                    Some(open.start..unit.end)
                }
                Some(open) => {
                    ranges.push(open);
                    Some(unit)
                }
                None => Some(unit),
            };
        }

        if let Some(open) = current {
            ranges.push(open);
        }
        ranges
    }

    /// Token-aware line splitting for a single oversized unit. Each range holds
    /// at least one line.
    fn chunk_by_tokens(&self, index: &LineIndex<'_>, lines: Range<usize>) -> Vec<Range<usize>> {
        let max_tokens = self.config.max_chunk_tokens;
        let mut ranges = Vec::new();
        let mut start = lines.start;

        for end in lines.start + 1..=lines.end {
            if end - start > 1 && index.tokens(start..end) > max_tokens {
                ranges.push(start..end - 1);
                start = end - 1;
            }
        }

        if start < lines.end {
            ranges.push(start..lines.end);
        }
        ranges
    }
}

/// Half-open line ranges between consecutive boundaries
fn units(boundaries: &[usize], line_count: usize) -> Vec<Range<usize>> {
    if line_count == 0 {
        return vec![0..0];
    }

    let mut starts: Vec<usize> = boundaries
        .iter()
        .copied()
        .filter(|&b| b < line_count)
        .collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| start..starts.get(i + 1).copied().unwrap_or(line_count))
        .collect()
}
