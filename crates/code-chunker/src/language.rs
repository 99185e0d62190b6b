use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// File types the review pipeline accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Python,
    Sql,
}

impl FileType {
    /// Detect file type from file extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" => Some(FileType::Python),
            "sql" => Some(FileType::Sql),
            _ => None,
        }
    }

    /// Detect file type from file path
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Get file type name as string
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Python => "python",
            FileType::Sql => "sql",
        }
    }

    /// Check if this file type is split with a tree-sitter grammar
    pub fn supports_ast(self) -> bool {
        matches!(self, FileType::Python)
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> Result<tree_sitter::Language> {
        match self {
            FileType::Python => Ok(tree_sitter_python::LANGUAGE.into()),
            FileType::Sql => Err(ChunkerError::tree_sitter(format!(
                "no grammar bundled for {}",
                self.as_str()
            ))),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
