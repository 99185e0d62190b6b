//! # codeqa review
//!
//! Model-backed quality review for Python and SQL files.
//!
//! ## Pipeline
//!
//! ```text
//! file path
//!     │
//!     ├──> classify by extension ──unsupported──> error report (no model call)
//!     ├──> read ──────────────────────failed────> error report (no model call)
//!     │
//!     ├──> chunk (codeqa-code-chunker)
//!     │
//!     ├──> one AnalysisClient call per chunk, all in flight together
//!     │      └─> model text ──repair──> PartialReport (never an error)
//!     │
//!     └──> merge by chunk position, lines shifted to file coordinates
//!            └─> FileReport
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use codeqa_code_chunker::Chunker;
//! use codeqa_review::{AnalysisClient, Analyzer, ModelConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AnalysisClient::gemini(ModelConfig::from_env()?)?;
//!     let analyzer = Analyzer::new(client, Chunker::default());
//!
//!     for report in analyzer.analyze_multiple(&["etl.py", "schema.sql"]).await {
//!         println!("{}: {} warnings", report.file_name, report.warnings_count);
//!     }
//!     Ok(())
//! }
//! ```

mod analyzer;
mod backend;
mod client;
mod config;
mod error;
mod repair;
mod report;

pub use analyzer::{merge_chunk_results, Analyzer};
pub use backend::{GeminiBackend, ModelBackend};
pub use client::{build_prompt, AnalysisClient};
pub use config::{
    ModelConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, MAX_TOKENS_ENV,
    MODEL_ENV, REQUEST_TIMEOUT_ENV, TEMPERATURE_ENV,
};
pub use error::{ReviewError, Result};
pub use repair::{json_span, parse_response, repair_response, ParseFailure};
pub use report::{
    FileReport, Issue, IssueType, PartialReport, Severity, DEFAULT_SUMMARY,
    UNEXPECTED_FORMAT_SUMMARY, UNPARSEABLE_ERROR, UNPARSEABLE_SUMMARY,
};
