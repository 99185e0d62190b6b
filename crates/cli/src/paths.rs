use codeqa_code_chunker::FileType;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Expand command-line paths into the list of files to analyze.
///
/// Directories contribute the supported files beneath them (sorted, hidden
/// entries and `.gitignore`d paths skipped). Anything else is passed through as
/// given, so an unsupported or missing file still gets its own error report.
pub fn expand_paths(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = scan_dir(input);
            log::info!("Found {} source files under {}", found.len(), input.display());
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    files
}

fn scan_dir(root: &Path) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false);

    let mut files = Vec::new();
    for result in builder.build() {
        match result {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }
                if FileType::from_path(entry.path()).is_some() {
                    files.push(entry.into_path());
                }
            }
            Err(e) => log::warn!("Failed to read entry: {e}"),
        }
    }
    files.sort();
    files
}
