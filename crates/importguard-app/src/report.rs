use anyhow::Context;
use importguard_render::{
    RenderableData, RenderableFinding, RenderableLocation, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};
use importguard_types::{
    Finding, ImportguardData, ImportguardReport, RunMeta, SCHEMA_REPORT_V1, Severity, ToolMeta,
    Verdict, VerdictCounts, VerdictStatus, ViolationCode, ids,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<ImportguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse importguard report")
}

pub fn serialize_report(report: &ImportguardReport) -> anyhow::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(report).context("serialize report")?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn to_renderable(report: &ImportguardReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict.status {
            VerdictStatus::Pass => RenderableVerdictStatus::Pass,
            VerdictStatus::Warn => RenderableVerdictStatus::Warn,
            VerdictStatus::Fail => RenderableVerdictStatus::Fail,
        },
        findings: report.findings.iter().map(renderable_finding).collect(),
        data: RenderableData {
            files_scanned: report.data.files_scanned,
            findings_emitted: report.data.findings_emitted,
            findings_total: report.data.findings_total,
            truncated_reason: report.data.truncated_reason.clone(),
        },
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    let code_number = (f.check_id == ids::CHECK_IMPORTS_ALLOWED)
        .then(|| ViolationCode::from_code_str(&f.code))
        .flatten()
        .map(ViolationCode::as_u8);

    RenderableFinding {
        severity: match f.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        check_id: Some(f.check_id.clone()),
        code: f.code.clone(),
        code_number,
        message: f.message.clone(),
        location: f.location.as_ref().map(|loc| RenderableLocation {
            path: loc.path.as_str().to_string(),
            line: loc.line,
            col: loc.col,
        }),
        help: f.help.clone(),
        url: f.url.clone(),
    }
}

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "importguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn instant_run() -> RunMeta {
    let now = OffsetDateTime::now_utc();
    RunMeta {
        started_at: now,
        ended_at: Some(now),
        duration_ms: Some(0),
    }
}

/// A passing report with nothing scanned.
pub fn empty_report() -> ImportguardReport {
    ImportguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: instant_run(),
        verdict: Verdict {
            status: VerdictStatus::Pass,
            counts: VerdictCounts::default(),
            reasons: Vec::new(),
        },
        findings: Vec::new(),
        data: ImportguardData::default(),
    }
}

/// A failing report carrying one `tool.runtime` finding, written when the tool itself fails.
pub fn runtime_error_report(message: &str) -> ImportguardReport {
    ImportguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: instant_run(),
        verdict: Verdict {
            status: VerdictStatus::Fail,
            counts: VerdictCounts {
                error: 1,
                ..VerdictCounts::default()
            },
            reasons: vec!["tool_error".to_string()],
        },
        findings: vec![Finding {
            severity: Severity::Error,
            check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
            location: None,
            help: Some("Fix the tool error and re-run importguard.".to_string()),
            url: None,
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        data: ImportguardData {
            findings_total: 1,
            findings_emitted: 1,
            ..ImportguardData::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use importguard_types::{Location, RepoPath, SourceRange};

    fn policy_finding(code: &str) -> Finding {
        Finding {
            severity: Severity::Error,
            check_id: ids::CHECK_IMPORTS_ALLOWED.to_string(),
            code: code.to_string(),
            message: "m".to_string(),
            location: Some(Location {
                path: RepoPath::new("src/a.ts"),
                line: Some(1),
                col: Some(8),
                range: Some(SourceRange::new(7, 10)),
            }),
            help: None,
            url: None,
            fingerprint: None,
            data: serde_json::Value::Null,
        }
    }

    #[test]
    fn serialized_report_parses_back() {
        let mut report = empty_report();
        report.findings.push(policy_finding(ids::CODE_DISALLOWED));
        let bytes = serialize_report(&report).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        let parsed = parse_report_json(&text).expect("parse");
        assert_eq!(parsed, report);
    }

    #[test]
    fn rejects_foreign_schema() {
        let err = parse_report_json(r#"{"schema":"other.report.v1"}"#).expect_err("schema");
        assert!(err.to_string().contains("unknown report schema"));
    }

    #[test]
    fn renderable_carries_numeric_codes_for_policy_findings_only() {
        let mut report = runtime_error_report("boom");
        report.findings.push(policy_finding(ids::CODE_UNCONFIGURED));
        let r = to_renderable(&report);
        assert_eq!(r.findings[0].code_number, None);
        assert_eq!(r.findings[1].code_number, Some(1));
        assert_eq!(r.verdict, RenderableVerdictStatus::Fail);
    }

    #[test]
    fn runtime_error_report_shape() {
        let report = runtime_error_report("config missing");
        assert_eq!(report.verdict.counts.error, 1);
        assert_eq!(report.findings[0].check_id, ids::CHECK_TOOL_RUNTIME);
        assert_eq!(report.findings[0].code, ids::CODE_RUNTIME_ERROR);
        assert_eq!(report.data.findings_total, 1);
    }
}
