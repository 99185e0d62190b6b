use crate::error::{ChunkerError, Result};
use crate::language::FileType;
use tree_sitter::Parser;

/// Finds line indices where a file can be split without cutting through a
/// syntactic unit.
///
/// Boundaries are 0-based line indices, strictly increasing, and always start
/// with `0`. Lines between two consecutive boundaries form one unit.
pub struct BoundaryFinder {
    file_type: FileType,
    parser: Option<Parser>,
}

impl BoundaryFinder {
    /// Create a boundary finder for a file type
    pub fn new(file_type: FileType) -> Result<Self> {
        let parser = if file_type.supports_ast() {
            let ts_language = file_type.tree_sitter_language()?;
            let mut parser = Parser::new();
            parser
                .set_language(&ts_language)
                .map_err(|e| ChunkerError::tree_sitter(format!("Failed to set language: {e}")))?;
            Some(parser)
        } else {
            None
        };

        Ok(Self { file_type, parser })
    }

    /// Compute unit boundaries for `content`
    pub fn find(&mut self, content: &str) -> Result<Vec<usize>> {
        let line_count = content.split_inclusive('\n').count();
        let mut boundaries = match (self.file_type, self.parser.as_mut()) {
            (FileType::Python, Some(parser)) => python_boundaries(parser, content)?,
            (FileType::Sql, _) => sql_boundaries(content),
            (FileType::Python, None) => {
                return Err(ChunkerError::tree_sitter("python parser not initialized"))
            }
        };

        boundaries.push(0);
        boundaries.retain(|&line| line < line_count.max(1));
        boundaries.sort_unstable();
        boundaries.dedup();
        Ok(boundaries)
    }
}

/// Every top-level node of the module starts a unit. Comment runs directly
/// above a node are pulled into that node's unit.
fn python_boundaries(parser: &mut Parser, content: &str) -> Result<Vec<usize>> {
    let tree = parser
        .parse(content, None)
        .ok_or_else(|| ChunkerError::parse("Failed to parse source code"))?;

    let root = tree.root_node();
    if root.has_error() {
        log::debug!("python source has syntax errors; boundaries are best-effort");
    }

    let mut boundaries = Vec::new();
    let mut pending_comment: Option<usize> = None;
    let mut cursor = root.walk();

    for child in root.children(&mut cursor) {
        let row = child.start_position().row;
        if child.kind() == "comment" {
            pending_comment.get_or_insert(row);
            continue;
        }

        boundaries.push(pending_comment.take().unwrap_or(row));
    }

    Ok(boundaries)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SqlState {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment,
}

/// A new unit begins on the line after each statement-terminating `;`.
fn sql_boundaries(content: &str) -> Vec<usize> {
    let bytes = content.as_bytes();
    let mut boundaries = Vec::new();
    let mut state = SqlState::Normal;
    let mut dollar_tag: Option<&[u8]> = None;
    let mut line = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        if b == b'\n' {
            line += 1;
            if state == SqlState::LineComment {
                state = SqlState::Normal;
            }
            i += 1;
            continue;
        }

        if let Some(tag) = dollar_tag {
            if bytes[i..].starts_with(tag) {
                i += tag.len();
                dollar_tag = None;
            } else {
                i += 1;
            }
            continue;
        }

        match state {
            SqlState::Normal => match b {
                b'\'' => state = SqlState::SingleQuoted,
                b'"' => state = SqlState::DoubleQuoted,
                b'-' if next == Some(b'-') => {
                    state = SqlState::LineComment;
                    i += 1;
                }
                b'/' if next == Some(b'*') => {
                    state = SqlState::BlockComment;
                    i += 1;
                }
                b'$' => {
                    if let Some(tag) = dollar_quote_tag(&bytes[i..]) {
                        i += tag.len();
                        dollar_tag = Some(tag);
                        continue;
                    }
                }
                b';' => boundaries.push(line + 1),
                _ => {}
            },
            SqlState::SingleQuoted => {
                if b == b'\'' {
                    state = SqlState::Normal;
                }
            }
            SqlState::DoubleQuoted => {
                if b == b'"' {
                    state = SqlState::Normal;
                }
            }
            SqlState::LineComment => {}
            SqlState::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    state = SqlState::Normal;
                    i += 1;
                }
            }
        }

        i += 1;
    }

    boundaries
}

/// Recognize a PostgreSQL dollar-quote opener (`$$` or `$tag$`)
fn dollar_quote_tag(rest: &[u8]) -> Option<&[u8]> {
    let close = rest
        .iter()
        .skip(1)
        .position(|&c| !(c.is_ascii_alphanumeric() || c == b'_'))?
        + 1;
    if rest.get(close) != Some(&b'$') {
        return None;
    }
    // `$1` style positional parameters are not quotes
    if rest.get(1).is_some_and(u8::is_ascii_digit) {
        return None;
    }
    Some(&rest[..=close])
}
