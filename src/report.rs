use crate::validation::ValidationResult;

/// Formats validation results into human-readable text panels.
pub struct ReportFormatter;

impl ReportFormatter {
    /// Status line followed by indented error and warning sections. Empty
    /// sections are omitted.
    pub fn format(result: &ValidationResult) -> String {
        let mut out = String::new();
        out.push_str(&Self::status_line(result));
        out.push('\n');

        if !result.errors.is_empty() {
            out.push_str(&format!("Errors ({}):\n", result.errors.len()));
            for error in &result.errors {
                out.push_str(&format!("  - {}\n", error));
            }
        }
        if !result.warnings.is_empty() {
            out.push_str(&format!("Warnings ({}):\n", result.warnings.len()));
            for warning in &result.warnings {
                out.push_str(&format!("  - {}\n", warning));
            }
        }
        out
    }

    fn status_line(result: &ValidationResult) -> String {
        match (result.is_valid, result.warnings.len()) {
            (true, 0) => "Flow is valid".to_string(),
            (true, n) => format!("Flow is valid with {} warning(s)", n),
            (false, _) => format!("Flow is invalid: {} error(s)", result.errors.len()),
        }
    }
}
