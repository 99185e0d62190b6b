//! # codeqa code chunker
//!
//! Splits Python and SQL sources into ordered, line-addressed chunks small
//! enough to send to a language model one at a time.
//!
//! ## Pipeline
//!
//! ```text
//! Source Code
//!     │
//!     ├──> File type (from extension)
//!     │
//!     ├──> Fits the token budget? ──yes──> single chunk, start_line = 1
//!     │
//!     ├──> Boundary finding
//!     │    ├─> Python: tree-sitter, top-level nodes
//!     │    └─> SQL: statement terminators outside strings/comments
//!     │
//!     └──> Packing
//!          ├─> Greedy merge of adjacent units under the budget
//!          ├─> Oversized units cut by tokens
//!          └─> Emit CodeChunk[] (contiguous, covering every line)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codeqa_code_chunker::{Chunker, ChunkerConfig, FileType};
//!
//! let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
//! let chunks = chunker.chunk("SELECT 1;\n", FileType::Sql).unwrap();
//!
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].start_line, 1);
//! ```

mod boundary;
mod chunker;
mod config;
mod error;
mod language;
mod strategy;
mod types;

pub use boundary::BoundaryFinder;
pub use chunker::{Chunker, ChunkingStats};
pub use config::{ChunkerConfig, ChunkingStrategy};
pub use error::{ChunkerError, Result};
pub use language::FileType;
pub use types::{estimate_tokens, CodeChunk};
