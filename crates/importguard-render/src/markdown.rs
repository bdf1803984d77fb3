use crate::{RenderableReport, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Importguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Files scanned: {}\n- Findings: {} (emitted) / {} (total)\n\n",
        verdict,
        report.data.files_scanned,
        report.data.findings_emitted,
        report.data.findings_total
    ));

    if let Some(r) = &report.data.truncated_reason {
        out.push_str(&format!("> Note: {}\n\n", r));
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");

    for f in &report.findings {
        let sev = match f.severity {
            RenderableSeverity::Info => "INFO",
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Error => "ERROR",
        };

        out.push_str(&format!("- [{}] ", sev));
        if let Some(loc) = &f.location {
            out.push_str(&format!("`{}` ", loc.display()));
        }
        match &f.check_id {
            Some(check_id) => out.push_str(&format!("`{}/{}`", check_id, f.code)),
            None => out.push_str(&format!("`{}`", f.code)),
        }
        if let Some(n) = f.code_number {
            out.push_str(&format!(" (IG{})", n));
        }
        out.push_str(&format!(": {}\n", f.flat_message()));

        if let Some(help) = &f.help {
            out.push_str(&format!("  - help: {}\n", help));
        }
        if let Some(url) = &f.url {
            out.push_str(&format!("  - url: {}\n", url));
        }
    }

    out
}
