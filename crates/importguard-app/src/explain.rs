//! The `explain` use case: look up check/code documentation.

use importguard_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(Explanation),
    /// Unknown identifier; includes available check_ids and codes.
    NotFound {
        identifier: String,
        available_check_ids: &'static [&'static str],
        available_codes: &'static [&'static str],
    },
}

/// Look up an explanation for a check_id, a code, or a numeric diagnostic code.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier.trim()) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_check_ids: explain::all_check_ids(),
            available_codes: explain::all_codes(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\nRemediation\n-----------\n");
    out.push_str(exp.remediation);
    out.push_str("\n\nExamples\n--------\n\n");
    for (label, body) in [
        ("Before (violation)", exp.examples.before),
        ("After (fixed)", exp.examples.after),
    ] {
        out.push_str(&format!("{label}:\n```toml\n{body}\n```\n\n"));
    }
    out.truncate(out.trim_end().len());
    out.push('\n');

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(
    identifier: &str,
    check_ids: &[&'static str],
    codes: &[&'static str],
) -> String {
    let mut out = format!("Unknown check_id or code: {}\n\n", identifier);
    out.push_str("Available check_ids:\n");
    for id in check_ids {
        out.push_str(&format!("  - {}\n", id));
    }
    out.push_str("\nAvailable codes (numeric aliases 1 and 2 also work):\n");
    for code in codes {
        out.push_str(&format!("  - {}\n", code));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(identifier: &str) -> Explanation {
        match run_explain(identifier) {
            ExplainOutput::Found(exp) => exp,
            ExplainOutput::NotFound { .. } => panic!("expected {identifier} to be known"),
        }
    }

    #[test]
    fn explain_check_id_and_codes() {
        found("imports.allowed");
        found("unconfigured");
        found("disallowed");
    }

    #[test]
    fn numeric_codes_alias_snake_case_codes() {
        assert_eq!(found("1").title, found("unconfigured").title);
        assert_eq!(found(" 2 ").title, found("disallowed").title);
    }

    #[test]
    fn explain_unknown_lists_alternatives() {
        match run_explain("no.such.check") {
            ExplainOutput::NotFound {
                identifier,
                available_check_ids,
                available_codes,
            } => {
                assert_eq!(identifier, "no.such.check");
                assert_eq!(available_check_ids, &["imports.allowed"]);
                assert_eq!(available_codes, &["unconfigured", "disallowed"]);
            }
            ExplainOutput::Found(_) => panic!("expected NotFound"),
        }
    }

    #[test]
    fn format_explanation_output() {
        let formatted = format_explanation(&found("disallowed"));
        assert!(formatted.contains("Remediation\n-----------"));
        assert!(formatted.contains("Before (violation):\n```toml\n"));
        assert!(formatted.ends_with("```\n"));
    }

    #[test]
    fn format_not_found_output() {
        let formatted = format_not_found("missing", &["check.one"], &["code.one"]);
        assert!(formatted.starts_with("Unknown check_id or code: missing\n"));
        assert!(formatted.contains("  - check.one\n"));
        assert!(formatted.contains("  - code.one\n"));
    }
}
