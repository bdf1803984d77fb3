use anyhow::{Context, bail};
use schemars::schema_for;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;

const SCHEMA_DIR: &str = "schemas";
const FIXTURES_DIR: &str = "tests/fixtures";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let cmd = args.next().unwrap_or_else(|| "help".to_string());
    let rest: Vec<String> = args.collect();

    match cmd.as_str() {
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "print-schema-ids" => print_schema_ids(),
        "conform" => conform(),
        "update-fixtures" => update_fixtures(&rest),
        "explain-coverage" => explain_coverage(),
        "help" | "-h" | "--help" => {
            help();
            Ok(())
        }
        other => {
            help();
            bail!("unknown command: {other}")
        }
    }
}

fn help() {
    eprintln!(
        "xtask commands:\n  \
         emit-schemas             Write JSON schemas for the report and config to schemas/\n  \
         validate-schemas         Check schemas/ matches the generated schemas\n  \
         print-schema-ids         Print schema identifiers and their output files\n  \
         conform                  Validate tests/fixtures golden reports against the report schema\n  \
         update-fixtures [BIN]    Regenerate golden reports with the importguard binary\n                           \
         (default: target/debug/importguard)\n  \
         explain-coverage         Check every check_id and code has an explanation"
    );
}

struct SchemaSpec {
    id: &'static str,
    file: &'static str,
    schema: fn() -> Value,
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            id: importguard_types::SCHEMA_REPORT_V1,
            file: "importguard.report.v1.json",
            schema: || to_value(schema_for!(importguard_types::ImportguardReport)),
        },
        SchemaSpec {
            id: importguard_settings::SCHEMA_CONFIG_V1,
            file: "importguard.config.v1.json",
            schema: || to_value(schema_for!(importguard_settings::ImportguardConfigV1)),
        },
    ]
}

fn to_value<T: serde::Serialize>(schema: T) -> Value {
    serde_json::to_value(schema).unwrap_or(Value::Null)
}

fn schema_text(spec: &SchemaSpec) -> anyhow::Result<String> {
    let mut text = serde_json::to_string_pretty(&(spec.schema)())
        .with_context(|| format!("serialize schema {}", spec.id))?;
    text.push('\n');
    Ok(text)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = Path::new(SCHEMA_DIR);
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    for spec in schema_specs() {
        let path = dir.join(spec.file);
        std::fs::write(&path, schema_text(&spec)?)
            .with_context(|| format!("write {}", path.display()))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn validate_schemas() -> anyhow::Result<()> {
    let mut stale = Vec::new();
    for spec in schema_specs() {
        let path = Path::new(SCHEMA_DIR).join(spec.file);
        let expected = schema_text(&spec)?;
        match std::fs::read_to_string(&path) {
            Ok(actual) if actual == expected => {}
            Ok(_) => stale.push(format!("{} (out of date)", path.display())),
            Err(_) => stale.push(format!("{} (missing)", path.display())),
        }
    }
    if !stale.is_empty() {
        bail!(
            "schemas need regenerating (run `cargo run -p xtask -- emit-schemas`):\n  {}",
            stale.join("\n  ")
        );
    }
    eprintln!("schemas up to date");
    Ok(())
}

fn print_schema_ids() -> anyhow::Result<()> {
    for spec in schema_specs() {
        println!("{}\t{}/{}", spec.id, SCHEMA_DIR, spec.file);
    }
    Ok(())
}

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..")
}

/// Fixture directories holding an `expected.report.json`, sorted.
fn fixture_dirs() -> anyhow::Result<Vec<PathBuf>> {
    let root = workspace_root().join(FIXTURES_DIR);
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(&root).with_context(|| format!("read {}", root.display()))? {
        let path = entry?.path();
        if path.join("expected.report.json").is_file() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn fixture_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Golden reports must match the report schema and already be normalized,
/// and must not leak absolute paths.
fn conform() -> anyhow::Result<()> {
    let schema = to_value(schema_for!(importguard_types::ImportguardReport));
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("compile report schema: {e}"))?;

    let mut failures = Vec::new();
    let dirs = fixture_dirs()?;
    for dir in &dirs {
        let name = fixture_name(dir);
        let path = dir.join("expected.report.json");
        let text =
            std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let report: Value =
            serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;

        for err in validator.iter_errors(&report) {
            failures.push(format!("{name}: schema validation: {err}"));
        }
        if importguard_test_util::normalize_nondeterministic(report.clone()) != report {
            failures.push(format!("{name}: report is not normalized"));
        }
        if text.contains(&workspace_root().display().to_string()) || text.contains("\\\\") {
            failures.push(format!("{name}: report contains a host path"));
        }
    }

    if !failures.is_empty() {
        bail!("conformance failures:\n  {}", failures.join("\n  "));
    }
    eprintln!("{} golden report(s) conform", dirs.len());
    Ok(())
}

/// Extra CLI arguments a fixture needs, keyed on what it contains.
fn fixture_args(dir: &Path) -> Vec<String> {
    if dir.join("tsconfig.json").is_file() && !dir.join("importguard.toml").is_file() {
        vec!["--tsconfig".to_string(), "tsconfig.json".to_string()]
    } else {
        Vec::new()
    }
}

fn update_fixtures(args: &[String]) -> anyhow::Result<()> {
    let bin = args
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| workspace_root().join("target/debug/importguard"));
    if !bin.is_file() {
        bail!(
            "importguard binary not found at {} (run `cargo build -p importguard-cli`)",
            bin.display()
        );
    }

    let tmp = tempfile::TempDir::new().context("create temp dir")?;
    for dir in fixture_dirs()? {
        let name = fixture_name(&dir);
        let report_path = tmp.path().join(format!("{name}.json"));
        let status = Command::new(&bin)
            .arg("--repo-root")
            .arg(&dir)
            .args(fixture_args(&dir))
            .args(["check", "--format", "quiet", "--report-out"])
            .arg(&report_path)
            .status()
            .with_context(|| format!("run importguard on {name}"))?;
        if !matches!(status.code(), Some(0 | 2)) {
            bail!("importguard failed on fixture {name}: {status}");
        }

        let text = std::fs::read_to_string(&report_path)
            .with_context(|| format!("read report for {name}"))?;
        let report: Value = serde_json::from_str(&text)?;
        let mut out =
            serde_json::to_string_pretty(&importguard_test_util::normalize_nondeterministic(
                report,
            ))?;
        out.push('\n');
        std::fs::write(dir.join("expected.report.json"), out)
            .with_context(|| format!("write golden report for {name}"))?;
        eprintln!("updated {name} (exit {})", status.code().unwrap_or(-1));
    }
    Ok(())
}

fn explain_coverage() -> anyhow::Result<()> {
    let mut missing = Vec::new();
    for id in importguard_types::explain::all_check_ids()
        .iter()
        .chain(importguard_types::explain::all_codes())
    {
        if importguard_types::lookup_explanation(id).is_none() {
            missing.push(*id);
        }
    }
    if !missing.is_empty() {
        bail!("missing explanations: {}", missing.join(", "));
    }
    eprintln!("explain coverage complete");
    Ok(())
}
