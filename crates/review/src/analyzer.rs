use crate::client::AnalysisClient;
use crate::report::{FileReport, PartialReport};
use codeqa_code_chunker::{Chunker, CodeChunk, FileType};
use futures::future::join_all;
use std::path::Path;

/// File-to-report pipeline: classify, read, chunk, fan out, merge.
#[derive(Clone)]
pub struct Analyzer {
    client: AnalysisClient,
    chunker: Chunker,
}

impl Analyzer {
    pub fn new(client: AnalysisClient, chunker: Chunker) -> Self {
        Self { client, chunker }
    }

    /// Analyze one file. Every failure mode yields a report; this never errors.
    pub async fn analyze_file(&self, path: impl AsRef<Path>) -> FileReport {
        let path = path.as_ref();
        let file_name = display_file_name(path);

        let Some(file_type) = FileType::from_path(path) else {
            log::info!("Skipping {}: unsupported file type", path.display());
            return FileReport::input_error(
                file_name,
                format!("Unsupported file type: {}", dotted_extension(path)),
            );
        };

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) => {
                log::warn!("Failed to read {}: {err}", path.display());
                return FileReport::input_error(file_name, format!("Error reading file: {err}"));
            }
        };

        let chunks = match self.chunker.chunk(&content, file_type) {
            Ok(chunks) => chunks,
            Err(err) => {
                log::warn!("Failed to chunk {}: {err}", path.display());
                return FileReport::input_error(file_name, format!("Error chunking file: {err}"));
            }
        };

        if let [chunk] = chunks.as_slice() {
            let partial = self
                .client
                .analyze_code(&chunk.code, file_type, &file_name)
                .await;
            return FileReport::from_partial(file_name, partial);
        }

        log::debug!("{file_name}: {}", Chunker::get_stats(&chunks));

        // All chunk requests are in flight before any is awaited; join_all
        // hands results back in submission order.
        let results = join_all(chunks.iter().map(|chunk| {
            let display_name = format!("{file_name} ({})", chunk.label());
            async move {
                self.client
                    .analyze_code(&chunk.code, file_type, &display_name)
                    .await
            }
        }))
        .await;

        merge_chunk_results(file_name, &chunks, results)
    }

    /// Analyze many files concurrently; one report per path, in input order.
    pub async fn analyze_multiple<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<FileReport> {
        log::info!(
            "Analyzing {} files with {}",
            paths.len(),
            self.client.model_name()
        );
        join_all(paths.iter().map(|path| self.analyze_file(path))).await
    }
}

/// Merge per-chunk results positionally: chunk `i`'s issues are shifted by
/// chunk `i`'s start line regardless of which request finished first.
///
/// Per-chunk `error` values and raw responses are not carried into the file
/// report; errors are logged instead.
pub fn merge_chunk_results(
    file_name: String,
    chunks: &[CodeChunk],
    results: Vec<PartialReport>,
) -> FileReport {
    let mut issues = Vec::new();
    let mut summaries = Vec::with_capacity(results.len());
    let mut production_ready = true;
    let mut warnings_count = 0usize;

    for (chunk, result) in chunks.iter().zip(results) {
        if let Some(err) = &result.error {
            log::warn!("{file_name} ({}): {err}", chunk.label());
        }

        issues.extend(result.issues.into_iter().map(|mut issue| {
            issue.offset_lines(chunk.start_line);
            issue
        }));
        summaries.push(result.summary);
        production_ready &= result.production_ready;
        warnings_count = warnings_count.saturating_add(result.warnings_count);
    }

    FileReport {
        file_name,
        issues,
        summary: summaries.join("\n"),
        production_ready,
        warnings_count,
        error: None,
        raw_response: None,
    }
}

fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
