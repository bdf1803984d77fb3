use crate::RenderableReport;

/// Compiler-style terminal output, one diagnostic per finding:
///
/// `path:line:col - error IG2: message`
///
/// Continuation lines of multi-line messages are indented by two spaces.
/// A summary line closes the output.
pub fn render_text(report: &RenderableReport) -> String {
    let mut out = String::new();

    for f in &report.findings {
        let prefix = match &f.location {
            Some(loc) => format!("{} - ", loc.display()),
            None => "importguard: ".to_string(),
        };
        let code = match f.code_number {
            Some(n) => format!("IG{}", n),
            None => f.code.clone(),
        };

        let mut lines = f.message.lines().map(str::trim_end).filter(|l| !l.is_empty());
        let first = lines.next().unwrap_or_default();
        out.push_str(&format!("{}{} {}: {}\n", prefix, f.severity.label(), code, first));
        for line in lines {
            out.push_str(&format!("  {}\n", line));
        }
    }

    if !report.findings.is_empty() {
        out.push('\n');
    }

    let total = report.data.findings_total;
    let noun = if total == 1 { "error" } else { "errors" };
    if total == 0 {
        out.push_str(&format!(
            "No import violations in {} file(s).\n",
            report.data.files_scanned
        ));
    } else {
        out.push_str(&format!(
            "Found {} {} in {} scanned file(s).\n",
            total, noun, report.data.files_scanned
        ));
    }
    if let Some(reason) = &report.data.truncated_reason {
        out.push_str(&format!("Note: {}\n", reason));
    }

    out
}
