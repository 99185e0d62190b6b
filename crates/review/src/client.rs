use crate::backend::{GeminiBackend, ModelBackend};
use crate::config::ModelConfig;
use crate::error::Result;
use crate::repair::repair_response;
use crate::report::PartialReport;
use codeqa_code_chunker::FileType;
use std::sync::Arc;

/// Sends code to the model and normalizes whatever comes back.
///
/// `analyze_code` never fails: transport errors and unusable responses both
/// turn into a degraded [`PartialReport`]. No retries happen here.
#[derive(Clone)]
pub struct AnalysisClient {
    backend: Arc<dyn ModelBackend>,
}

impl AnalysisClient {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self { backend }
    }

    /// Client talking to Gemini with the given settings
    pub fn gemini(config: ModelConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(GeminiBackend::new(config)?)))
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    pub async fn analyze_code(
        &self,
        code: &str,
        file_type: FileType,
        display_name: &str,
    ) -> PartialReport {
        let prompt = build_prompt(code, file_type, display_name);
        log::debug!(
            "requesting analysis of {display_name} from {} ({} prompt bytes)",
            self.backend.model_name(),
            prompt.len()
        );

        match self.backend.generate(&prompt).await {
            Ok(text) => repair_response(&text),
            Err(err) => {
                log::warn!("analysis request for {display_name} failed: {err}");
                PartialReport::processing_failed(err.to_string())
            }
        }
    }
}

/// The review prompt for one piece of code
pub fn build_prompt(code: &str, file_type: FileType, display_name: &str) -> String {
    let tag = file_type.as_str();
    let upper = tag.to_uppercase();

    format!(
        r#"You are a code quality assurance expert. Analyze this {upper} code from the file "{display_name}"
and identify any issues related to:

1. Syntax errors or potential bugs
2. Coding standards violations (PEP8 for Python, ANSI SQL best practices for SQL)
3. Security concerns or unsafe patterns
4. Production readiness issues

For SQL files, specifically flag:
- DELETE statements without WHERE clauses
- TRUNCATE TABLE statements
- DROP TABLE/DATABASE statements
- Queries that might cause performance issues

For Python files, specifically check for:
- PEP8 violations
- Error handling issues
- Resource management problems (unclosed files, connections)
- Unreachable code or unused variables

Return your analysis in the following JSON format:
{{
    "issues": [
        {{
            "line_start": <line_number>,
            "line_end": <line_number>,
            "issue_type": "<syntax|standard|security|performance>",
            "severity": "<high|medium|low>",
            "description": "<detailed description>",
            "suggested_fix": "<code suggestion>"
        }}
    ],
    "summary": "<overall code quality assessment>",
    "production_ready": <true|false>,
    "warnings_count": <number>
}}

HERE IS THE CODE TO ANALYZE:
```{tag}
{code}
```
"#
    )
}
