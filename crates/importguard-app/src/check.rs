//! The `check` use case: scan a repository, evaluate the import policy, produce a report.

use anyhow::Context;
use camino::Utf8Path;
use importguard_domain::fingerprint::fingerprint_for_violation;
use importguard_domain::{FileIdentity, PolicyEngine, Violation};
use importguard_scan::ScannedFile;
use importguard_settings::{ImportguardConfigV1, Overrides, ResolvedConfig};
use importguard_types::{
    Finding, ImportguardData, ImportguardReport, Location, RunMeta, SCHEMA_REPORT_V1, Severity,
    ToolMeta, Verdict, VerdictCounts, VerdictStatus, ViolationCode, ids,
};
use rayon::prelude::*;
use time::OffsetDateTime;

/// Where the policy comes from.
#[derive(Clone, Copy, Debug)]
pub enum ConfigSource<'a> {
    /// `importguard.toml` contents (empty string if the file is absent).
    Toml(&'a str),
    /// `tsconfig.json` contents carrying the plugin entry.
    Tsconfig(&'a str),
}

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Repository root path.
    pub repo_root: &'a Utf8Path,
    pub config: ConfigSource<'a>,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: ImportguardReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Parse the policy from its source and apply overrides.
///
/// An empty TOML source (no config file) yields the defaults: no rules.
pub fn load_policy(
    source: ConfigSource<'_>,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let cfg = match source {
        ConfigSource::Toml(text) if text.trim().is_empty() => ImportguardConfigV1::default(),
        ConfigSource::Toml(text) => {
            importguard_settings::parse_config_toml(text).context("parse config")?
        }
        ConfigSource::Tsconfig(text) => {
            importguard_settings::parse_tsconfig_json(text).context("parse tsconfig")?
        }
    };
    importguard_settings::resolve_config(cfg, overrides).context("resolve config")
}

/// Run the check use case: parse config, discover sources, evaluate policy, produce report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();
    let _span = tracing::info_span!("check", repo_root = %input.repo_root).entered();

    let resolved = load_policy(input.config, input.overrides)?;

    let files = importguard_scan::discover_sources(
        input.repo_root,
        &resolved.include,
        &resolved.exclude,
    )
    .context("discover sources")?;
    let scanned = importguard_scan::scan_files(
        input.repo_root,
        &files,
        resolved.jsx_import_source.as_deref(),
    )
    .context("scan sources")?;

    let engine = PolicyEngine::new(&resolved.policy);
    if engine.rule_count() == 0 {
        tracing::warn!("no import rules configured; every located import will be reported");
    }

    // Parallel per file; `collect` keeps discovery (path) order.
    let mut findings: Vec<Finding> = scanned
        .par_iter()
        .map(|file| findings_for_file(&engine, file))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    let counts = count_severities(&findings);
    let findings_total = findings.len();
    let truncated_reason = (findings_total > resolved.max_findings).then(|| {
        findings.truncate(resolved.max_findings);
        format!(
            "findings truncated to max_findings={} ({} total)",
            resolved.max_findings, findings_total
        )
    });

    let imports_scanned: usize = scanned.iter().map(|f| f.imports.len()).sum();
    tracing::info!(
        files = scanned.len(),
        imports = imports_scanned,
        findings = findings_total,
        "check complete"
    );

    let status = if counts.error > 0 {
        VerdictStatus::Fail
    } else if counts.warn > 0 {
        VerdictStatus::Warn
    } else {
        VerdictStatus::Pass
    };
    let reasons = if status == VerdictStatus::Fail {
        vec!["import_violations".to_string()]
    } else {
        Vec::new()
    };

    let ended_at = OffsetDateTime::now_utc();
    let duration_ms = (ended_at - started_at).whole_milliseconds().max(0) as u64;

    let report = ImportguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "importguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        run: RunMeta {
            started_at,
            ended_at: Some(ended_at),
            duration_ms: Some(duration_ms),
        },
        verdict: Verdict {
            status,
            counts,
            reasons,
        },
        data: ImportguardData {
            rules_configured: to_u32(engine.rule_count()),
            files_scanned: to_u32(scanned.len()),
            imports_scanned: to_u32(imports_scanned),
            findings_total: to_u32(findings_total),
            findings_emitted: to_u32(findings.len()),
            truncated_reason,
        },
        findings,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(status: VerdictStatus) -> i32 {
    match status {
        VerdictStatus::Pass => 0,
        VerdictStatus::Warn => 0,
        VerdictStatus::Fail => 2,
    }
}

fn findings_for_file(engine: &PolicyEngine, file: &ScannedFile) -> Vec<Finding> {
    let identity = FileIdentity::new(file.path.clone());
    engine
        .evaluate(&identity, &file.imports)
        .iter()
        .map(|v| finding_from_violation(file, v))
        .collect()
}

fn finding_from_violation(file: &ScannedFile, v: &Violation) -> Finding {
    let (line, col) = file.line_col(v.range.start);
    let help = match v.code {
        ViolationCode::Unconfigured => {
            "Add a rule whose file pattern covers this file to the [imports] table."
        }
        ViolationCode::Disallowed => {
            "Remove the import, or add a matching pattern to the allow-list for this file."
        }
    };

    Finding {
        severity: v.severity,
        check_id: ids::CHECK_IMPORTS_ALLOWED.to_string(),
        code: v.code.as_str().to_string(),
        message: v.message.clone(),
        location: Some(Location {
            path: v.file.clone(),
            line: Some(line),
            col: Some(col),
            range: Some(v.range),
        }),
        help: Some(help.to_string()),
        url: None,
        fingerprint: Some(fingerprint_for_violation(v)),
        data: serde_json::json!({
            "specifier": v.specifier,
            "diagnostic_code": v.code.as_u8(),
            "allowed": v.allowed,
        }),
    }
}

fn count_severities(findings: &[Finding]) -> VerdictCounts {
    let mut counts = VerdictCounts::default();
    for f in findings {
        match f.severity {
            Severity::Info => counts.info += 1,
            Severity::Warning => counts.warn += 1,
            Severity::Error => counts.error += 1,
        }
    }
    counts
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
[imports]
"src/ui/**" = ["react", "./*.css"]
"#;

    fn repo(files: &[(&str, &str)]) -> (TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
        for (path, contents) in files {
            let abs = root.join(path);
            if let Some(parent) = abs.parent() {
                std::fs::create_dir_all(parent).expect("create parent");
            }
            std::fs::write(&abs, contents).expect("write file");
        }
        (tmp, root)
    }

    fn check(root: &Utf8Path, config: ConfigSource<'_>, overrides: Overrides) -> CheckOutput {
        run_check(CheckInput {
            repo_root: root,
            config,
            overrides,
        })
        .expect("run_check")
    }

    #[test]
    fn clean_repo_passes() {
        let (_tmp, root) = repo(&[(
            "src/ui/Button.tsx",
            "import React from 'react';\nimport './Button.css';\n",
        )]);
        let out = check(&root, ConfigSource::Toml(CONFIG), Overrides::default());

        assert_eq!(out.report.verdict.status, VerdictStatus::Pass);
        assert!(out.report.findings.is_empty());
        assert_eq!(out.report.data.files_scanned, 1);
        assert_eq!(out.report.data.imports_scanned, 2);
        assert_eq!(out.report.data.rules_configured, 1);
    }

    #[test]
    fn disallowed_import_becomes_located_finding() {
        let (_tmp, root) = repo(&[(
            "src/ui/Button.tsx",
            "import React from 'react';\nimport _ from \"lodash\";\n",
        )]);
        let out = check(&root, ConfigSource::Toml(CONFIG), Overrides::default());

        assert_eq!(out.report.verdict.status, VerdictStatus::Fail);
        assert_eq!(out.report.verdict.counts.error, 1);
        let f = &out.report.findings[0];
        assert_eq!(f.check_id, ids::CHECK_IMPORTS_ALLOWED);
        assert_eq!(f.code, ids::CODE_DISALLOWED);
        assert!(f.message.contains("react, \n./*.css"));
        let loc = f.location.as_ref().expect("location");
        assert_eq!(loc.path.as_str(), "src/ui/Button.tsx");
        assert_eq!((loc.line, loc.col), (Some(2), Some(15)));
        assert_eq!(f.data["specifier"], "lodash");
        assert_eq!(f.data["diagnostic_code"], 2);
        assert_eq!(f.fingerprint.as_ref().map(String::len), Some(64));
    }

    #[test]
    fn empty_config_reports_every_import_as_unconfigured() {
        let (_tmp, root) = repo(&[("a.ts", "import 'x';\nrequire('y');\n")]);
        let out = check(&root, ConfigSource::Toml(""), Overrides::default());

        let codes: Vec<&str> = out.report.findings.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec![ids::CODE_UNCONFIGURED, ids::CODE_UNCONFIGURED]);
    }

    #[test]
    fn findings_follow_path_then_import_order() {
        let (_tmp, root) = repo(&[
            ("src/b.ts", "import 'b1';\nimport 'b2';\n"),
            ("src/a.ts", "import 'a1';\n"),
        ]);
        let out = check(&root, ConfigSource::Toml(""), Overrides::default());

        let specs: Vec<&str> = out
            .report
            .findings
            .iter()
            .map(|f| f.data["specifier"].as_str().unwrap_or_default())
            .collect();
        assert_eq!(specs, vec!["a1", "b1", "b2"]);
    }

    #[test]
    fn max_findings_truncates_with_reason() {
        let (_tmp, root) = repo(&[("a.ts", "import 'x';\nimport 'y';\nimport 'z';\n")]);
        let overrides = Overrides {
            max_findings: Some(2),
            ..Overrides::default()
        };
        let out = check(&root, ConfigSource::Toml(""), overrides);

        assert_eq!(out.report.findings.len(), 2);
        assert_eq!(out.report.data.findings_total, 3);
        assert_eq!(out.report.data.findings_emitted, 2);
        assert_eq!(out.report.verdict.counts.error, 3);
        assert!(
            out.report
                .data
                .truncated_reason
                .as_deref()
                .is_some_and(|r| r.contains("max_findings=2"))
        );
    }

    #[test]
    fn tsconfig_plugin_entry_with_jsx_runtime() {
        let tsconfig = r#"{
  // comments are fine
  "compilerOptions": {
    "jsx": "react-jsx",
    "plugins": [
      { "name": "ts-allow-imports-plugin", "imports": { "src/**": ["./*"] } },
    ],
  },
}"#;
        let (_tmp, root) = repo(&[("src/App.tsx", "import x from './x';\n")]);
        let out = check(&root, ConfigSource::Tsconfig(tsconfig), Overrides::default());

        // The synthesized `react/jsx-runtime` import is counted but never reported.
        assert_eq!(out.report.data.imports_scanned, 2);
        assert!(out.report.findings.is_empty());
    }

    #[test]
    fn invalid_config_is_an_error() {
        let (_tmp, root) = repo(&[]);
        let err = run_check(CheckInput {
            repo_root: &root,
            config: ConfigSource::Toml("imports = 3"),
            overrides: Overrides::default(),
        })
        .expect_err("invalid config");
        assert!(format!("{err:#}").contains("parse config"));
    }

    #[test]
    fn verdict_exit_codes() {
        assert_eq!(verdict_exit_code(VerdictStatus::Pass), 0);
        assert_eq!(verdict_exit_code(VerdictStatus::Warn), 0);
        assert_eq!(verdict_exit_code(VerdictStatus::Fail), 2);
    }

    #[test]
    fn load_policy_from_each_source() {
        let empty = load_policy(ConfigSource::Toml("  \n"), Overrides::default())
            .expect("empty toml");
        assert!(empty.policy.rules.is_empty());

        let toml = load_policy(ConfigSource::Toml(CONFIG), Overrides::default()).expect("toml");
        assert_eq!(toml.policy.rules.len(), 1);
        assert_eq!(toml.policy.rules[0].file_pattern, "src/ui/**");

        let tsconfig = load_policy(
            ConfigSource::Tsconfig(
                r#"{ "compilerOptions": { "plugins": [
                    { "name": "importguard", "imports": { "src/**": ["react"] } }, // policy
                ] } }"#,
            ),
            Overrides::default(),
        )
        .expect("tsconfig");
        assert_eq!(tsconfig.policy.rules[0].allowed_imports, vec!["react"]);
    }

    #[test]
    fn load_policy_reports_parse_errors_with_context() {
        let err = load_policy(ConfigSource::Toml("[imports"), Overrides::default())
            .expect_err("bad toml");
        assert!(format!("{err:#}").starts_with("parse config"));

        let err = load_policy(ConfigSource::Tsconfig("{"), Overrides::default())
            .expect_err("bad tsconfig");
        assert!(format!("{err:#}").starts_with("parse tsconfig"));
    }
}
