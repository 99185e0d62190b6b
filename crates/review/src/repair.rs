//! Turning untrusted model text into a [`PartialReport`].
//!
//! [`parse_response`] is the strict tiered parser; [`repair_response`] maps each
//! failure tier onto its degraded fallback so callers always get a report.

use crate::report::{count_from_value, text_from_value, Issue, PartialReport, DEFAULT_SUMMARY};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    /// Blank text, or no mention of an issues structure at all
    #[error("response is empty or has no issues structure")]
    Empty,

    #[error("response contains no JSON object")]
    NoJsonObject,

    #[error("malformed JSON in response: {0}")]
    MalformedJson(String),
}

/// Top-level fields as sent. Only a syntax error or an `issues` value that is
/// not a list fails the decode; everything else is coerced in
/// [`RawReport::into_partial`].
#[derive(Debug, Deserialize)]
struct RawReport {
    #[serde(default)]
    issues: Option<Vec<Value>>,
    #[serde(default)]
    summary: Option<Value>,
    #[serde(default)]
    production_ready: Option<Value>,
    #[serde(default)]
    warnings_count: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

impl RawReport {
    fn into_partial(self) -> PartialReport {
        let issues: Vec<Issue> = self
            .issues
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Issue>(value) {
                Ok(issue) => Some(issue),
                Err(e) => {
                    log::debug!("dropping unusable issue entry: {e}");
                    None
                }
            })
            .collect();

        let warnings_count = self
            .warnings_count
            .as_ref()
            .and_then(count_from_value)
            .unwrap_or(issues.len());

        PartialReport {
            summary: self
                .summary
                .and_then(text_from_value)
                .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            production_ready: self.production_ready.is_some_and(is_truthy),
            warnings_count,
            error: self.error.and_then(text_from_value),
            raw_response: None,
            issues,
        }
    }
}

/// `true`, or the string "true" in any case
fn is_truthy(value: Value) -> bool {
    match value {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn json_span_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex is valid"))
}

/// Greedy span from the first `{` to the last `}`
pub fn json_span(text: &str) -> Option<&str> {
    json_span_regex().find(text).map(|m| m.as_str())
}

/// Strict parse of a model response. Present fields are kept as-is, even when
/// they disagree with each other.
pub fn parse_response(raw: &str) -> Result<PartialReport, ParseFailure> {
    if raw.trim().is_empty() || !raw.contains("issues") {
        return Err(ParseFailure::Empty);
    }

    let span = json_span(raw).ok_or(ParseFailure::NoJsonObject)?;
    let decoded: RawReport =
        serde_json::from_str(span).map_err(|e| ParseFailure::MalformedJson(e.to_string()))?;

    Ok(decoded.into_partial())
}

/// Parse a model response, degrading to a well-formed fallback on any failure
pub fn repair_response(raw: &str) -> PartialReport {
    match parse_response(raw) {
        Ok(partial) => partial,
        Err(ParseFailure::Empty) => {
            log::debug!("model response unusable: {}", ParseFailure::Empty);
            PartialReport::unparseable()
        }
        Err(failure) => {
            log::warn!("model response in unexpected format: {failure}");
            PartialReport::unexpected_format(raw)
        }
    }
}
