use codeqa_review::FileReport;

pub fn render_text_report(reports: &[FileReport]) -> String {
    let ready = reports.iter().filter(|r| r.production_ready).count();
    let failed = reports.iter().filter(|r| r.is_error()).count();
    let warnings: usize = reports.iter().map(|r| r.warnings_count).sum();

    let mut md = String::new();
    md.push_str("# Code quality report\n\n");
    md.push_str(&format!("- Files: `{}`\n", reports.len()));
    md.push_str(&format!("- Production ready: `{ready}/{}`\n", reports.len()));
    md.push_str(&format!("- Warnings: `{warnings}`\n"));
    if failed > 0 {
        md.push_str(&format!("- Errors: `{failed}`\n"));
    }
    md.push('\n');

    for report in reports {
        render_file(&mut md, report);
    }
    md
}

fn render_file(md: &mut String, report: &FileReport) {
    md.push_str(&format!("## {}\n\n", report.file_name));
    md.push_str(&format!("- Status: {}\n", status(report)));
    md.push_str(&format!("- Warnings: `{}`\n", report.warnings_count));
    if let Some(error) = &report.error {
        md.push_str(&format!("- Error: {}\n", truncate_one_line(error, 200)));
    }
    md.push('\n');

    if !report.summary.trim().is_empty() {
        md.push_str(report.summary.trim_end());
        md.push_str("\n\n");
    }

    if report.issues.is_empty() {
        return;
    }

    md.push_str("| lines | type | severity | description | suggested fix |\n");
    md.push_str("|---:|---|---|---|---|\n");
    for issue in &report.issues {
        let lines = if issue.line_end > issue.line_start {
            format!("{}-{}", issue.line_start, issue.line_end)
        } else {
            issue.line_start.to_string()
        };
        md.push_str(&format!(
            "| `{}` | {} | {} | {} | {} |\n",
            lines,
            issue.issue_type.as_str(),
            issue.severity.as_str(),
            escape_cell(&truncate_one_line(&issue.description, 160)),
            escape_cell(&truncate_one_line(&issue.suggested_fix, 120)),
        ));
    }
    md.push('\n');
}

fn status(report: &FileReport) -> &'static str {
    if report.is_error() {
        "error"
    } else if report.production_ready {
        "production ready"
    } else {
        "not production ready"
    }
}

fn truncate_one_line(text: &str, max_chars: usize) -> String {
    let s = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.chars().count() <= max_chars {
        return s;
    }
    let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{truncated}…")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
