//! Report data model shared by the client, the analyzer and the CLI.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const UNPARSEABLE_SUMMARY: &str = "Analysis could not be completed.";
pub const UNPARSEABLE_ERROR: &str = "Failed to parse response";
pub const DEFAULT_SUMMARY: &str = "Analysis completed.";
pub const UNEXPECTED_FORMAT_SUMMARY: &str =
    "Analysis completed but response format was unexpected.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Syntax,
    Standard,
    Security,
    Performance,
    /// Any label the model invents outside the four categories
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
    Unknown,
}

impl IssueType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::Standard => "standard",
            Self::Security => "security",
            Self::Performance => "performance",
            Self::Unknown => "unknown",
        }
    }

    /// Case-insensitive label match; anything else is `Unknown`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "syntax" => Self::Syntax,
            "standard" => Self::Standard,
            "security" => Self::Security,
            "performance" => Self::Performance,
            _ => Self::Unknown,
        }
    }
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }

    /// Case-insensitive label match; anything else is `Unknown`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for IssueType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map_or(Self::Unknown, Self::from_label))
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map_or(Self::Unknown, Self::from_label))
    }
}

fn default_issue_type() -> IssueType {
    IssueType::Unknown
}

fn default_severity() -> Severity {
    Severity::Unknown
}

/// One finding reported by the model.
///
/// Decoding never fails on a JSON object: null or mistyped fields fall back
/// to empty text, line 0 or `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default, deserialize_with = "lenient_line")]
    pub line_start: usize,
    #[serde(default, deserialize_with = "lenient_line")]
    pub line_end: usize,
    #[serde(default = "default_issue_type")]
    pub issue_type: IssueType,
    #[serde(default = "default_severity")]
    pub severity: Severity,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub suggested_fix: String,
}

impl Issue {
    /// Shift chunk-local line numbers by the chunk's starting line
    pub fn offset_lines(&mut self, start_line: usize) {
        self.line_start = self.line_start.saturating_add(start_line);
        self.line_end = self.line_end.saturating_add(start_line);
    }
}

/// Non-negative count from any JSON number or numeric string. Fractions are
/// truncated; negatives and everything else are `None`.
pub(crate) fn count_from_value(value: &Value) -> Option<usize> {
    let as_count = |f: f64| (f.is_finite() && f >= 0.0).then(|| f as usize);
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|n| n as usize)
            .or_else(|| n.as_f64().and_then(as_count)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<usize>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(as_count))
        }
        _ => None,
    }
}

/// Text from a string, number or bool; `None` for null, arrays and objects
pub(crate) fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_line<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value).unwrap_or(0))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(value).unwrap_or_default())
}

/// What the analysis client produces for one request. It may describe a
/// degraded result; it is never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialReport {
    pub issues: Vec<Issue>,
    pub summary: String,
    pub production_ready: bool,
    pub warnings_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl PartialReport {
    /// Response was empty or never mentioned an issues structure
    pub fn unparseable() -> Self {
        Self {
            issues: Vec::new(),
            summary: UNPARSEABLE_SUMMARY.to_string(),
            production_ready: false,
            warnings_count: 0,
            error: Some(UNPARSEABLE_ERROR.to_string()),
            raw_response: None,
        }
    }

    /// Response held no decodable JSON object; keep the text for diagnostics
    pub fn unexpected_format(raw: impl Into<String>) -> Self {
        Self {
            issues: Vec::new(),
            summary: UNEXPECTED_FORMAT_SUMMARY.to_string(),
            production_ready: false,
            warnings_count: 0,
            error: None,
            raw_response: Some(raw.into()),
        }
    }

    /// The request or response handling failed outright
    pub fn processing_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            issues: Vec::new(),
            summary: format!("Error processing response: {message}"),
            production_ready: false,
            warnings_count: 0,
            error: Some(message),
            raw_response: None,
        }
    }
}

/// Final per-file result. Line numbers always refer to the original file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub file_name: String,
    pub issues: Vec<Issue>,
    pub summary: String,
    pub production_ready: bool,
    pub warnings_count: usize,
    #[serde(default)]
    pub error: Option<String>,
    /// Model text kept when the reply could not be decoded; `null` otherwise
    #[serde(default)]
    pub raw_response: Option<String>,
}

impl FileReport {
    pub fn from_partial(file_name: impl Into<String>, partial: PartialReport) -> Self {
        Self {
            file_name: file_name.into(),
            issues: partial.issues,
            summary: partial.summary,
            production_ready: partial.production_ready,
            warnings_count: partial.warnings_count,
            error: partial.error,
            raw_response: partial.raw_response,
        }
    }

    /// A file that was rejected before any model call
    pub fn input_error(file_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            issues: Vec::new(),
            summary: String::new(),
            production_ready: false,
            warnings_count: 0,
            error: Some(message.into()),
            raw_response: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn issue_decodes_the_requested_shape() {
        let issue: Issue = serde_json::from_value(json!({
            "line_start": 3,
            "line_end": 4,
            "issue_type": "security",
            "severity": "high",
            "description": "DELETE without WHERE",
            "suggested_fix": "DELETE FROM t WHERE id = ?"
        }))
        .unwrap();

        assert_eq!(
            issue,
            Issue {
                line_start: 3,
                line_end: 4,
                issue_type: IssueType::Security,
                severity: Severity::High,
                description: "DELETE without WHERE".to_string(),
                suggested_fix: "DELETE FROM t WHERE id = ?".to_string(),
            }
        );
    }

    #[test]
    fn issue_tolerates_sloppy_fields() {
        let issue: Issue = serde_json::from_value(json!({
            "line_start": "12",
            "line_end": null,
            "issue_type": "style",
            "severity": "critical"
        }))
        .unwrap();

        assert_eq!(issue.line_start, 12);
        assert_eq!(issue.line_end, 0);
        assert_eq!(issue.issue_type, IssueType::Unknown);
        assert_eq!(issue.severity, Severity::Unknown);
        assert!(issue.description.is_empty());
    }

    #[test]
    fn null_and_mistyped_fields_fall_back() {
        let issue: Issue = serde_json::from_value(json!({
            "line_start": 4.0,
            "line_end": -2,
            "issue_type": null,
            "severity": 3,
            "description": null,
            "suggested_fix": 42
        }))
        .unwrap();

        assert_eq!((issue.line_start, issue.line_end), (4, 0));
        assert_eq!(issue.issue_type, IssueType::Unknown);
        assert_eq!(issue.severity, Severity::Unknown);
        assert_eq!(issue.description, "");
        assert_eq!(issue.suggested_fix, "42");
    }

    #[test]
    fn labels_match_case_insensitively() {
        let issue: Issue = serde_json::from_value(json!({
            "issue_type": "Security",
            "severity": " HIGH "
        }))
        .unwrap();
        assert_eq!(issue.issue_type, IssueType::Security);
        assert_eq!(issue.severity, Severity::High);

        assert_eq!(IssueType::from_label("PERFORMANCE"), IssueType::Performance);
        assert_eq!(Severity::from_label("Medium"), Severity::Medium);
        assert_eq!(Severity::from_label("blocker"), Severity::Unknown);
    }

    #[test]
    fn counts_accept_any_number_form() {
        assert_eq!(count_from_value(&json!(3)), Some(3));
        assert_eq!(count_from_value(&json!(1.0)), Some(1));
        assert_eq!(count_from_value(&json!(2.9)), Some(2));
        assert_eq!(count_from_value(&json!("7")), Some(7));
        assert_eq!(count_from_value(&json!("1.5")), Some(1));
        assert_eq!(count_from_value(&json!(-1)), None);
        assert_eq!(count_from_value(&json!(null)), None);
        assert_eq!(count_from_value(&json!([1])), None);
    }

    #[test]
    fn missing_lines_default_to_zero() {
        let issue: Issue = serde_json::from_value(json!({"description": "x"})).unwrap();
        assert_eq!((issue.line_start, issue.line_end), (0, 0));
    }

    #[test]
    fn offset_lines_shifts_both_ends() {
        let mut issue: Issue = serde_json::from_value(json!({"line_start": 2, "line_end": 5})).unwrap();
        issue.offset_lines(40);
        assert_eq!((issue.line_start, issue.line_end), (42, 45));
    }

    #[test]
    fn degraded_shapes() {
        let unparseable = PartialReport::unparseable();
        assert!(!unparseable.production_ready);
        assert_eq!(unparseable.error.as_deref(), Some(UNPARSEABLE_ERROR));
        assert_eq!(unparseable.summary, UNPARSEABLE_SUMMARY);

        let unexpected = PartialReport::unexpected_format("hello");
        assert_eq!(unexpected.raw_response.as_deref(), Some("hello"));
        assert!(unexpected.error.is_none());

        let failed = PartialReport::processing_failed("boom");
        assert_eq!(failed.summary, "Error processing response: boom");
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }

    #[test]
    fn report_json_always_carries_error_and_raw_response() {
        let report = FileReport::input_error("notes.txt", "Unsupported file type: .txt");
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["file_name"], "notes.txt");
        assert_eq!(value["error"], "Unsupported file type: .txt");
        assert_eq!(value["issues"], json!([]));
        assert_eq!(value.get("raw_response"), Some(&Value::Null));
    }
}
