//! Shared test utilities for the importguard workspace.
//!
//! Lives in its own crate because `xtask` uses the normalization at runtime
//! (regenerating golden reports), not only under `#[cfg(test)]`.

use serde_json::Value;
use std::path::PathBuf;

pub const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";
pub const VERSION_PLACEHOLDER: &str = "__VERSION__";

/// Keys whose values change on every run, at any depth.
const TIMESTAMP_KEYS: &[&str] = &["started_at", "ended_at"];

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// `tool.version` is replaced only on a root report envelope (an object with
/// `schema`, `tool`, `run`, `verdict` and `findings`), so finding payloads that
/// happen to contain a `tool` object are left alone. Timestamps and
/// `duration_ms` are replaced at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if is_envelope(&value)
        && let Some(tool) = value.get_mut("tool").and_then(Value::as_object_mut)
        && tool.contains_key("version")
    {
        tool.insert(
            "version".to_string(),
            Value::String(VERSION_PLACEHOLDER.to_string()),
        );
    }
    normalize_run_fields(&mut value);
    value
}

fn is_envelope(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| {
        ["schema", "tool", "run", "verdict", "findings"]
            .iter()
            .all(|k| obj.contains_key(*k))
    })
}

fn normalize_run_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
                if let Some(v) = map.get_mut(*key)
                    && !v.is_null()
                {
                    *v = Value::String(TIMESTAMP_PLACEHOLDER.to_string());
                }
            }
            if let Some(v) = map.get_mut("duration_ms") {
                *v = Value::Number(0.into());
            }
            for v in map.values_mut() {
                normalize_run_fields(v);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_run_fields),
        _ => {}
    }
}

/// `tests/fixtures` at the workspace root.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("fixtures")
}

/// Parse `tests/fixtures/<name>/expected.report.json`.
pub fn load_expected_report(fixture: &str) -> Value {
    let path = fixtures_dir().join(fixture).join("expected.report.json");
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("read {}: {err}", path.display()));
    serde_json::from_str(&text).unwrap_or_else(|err| panic!("parse {}: {err}", path.display()))
}

/// Assert two reports are equal once non-deterministic fields are normalized.
pub fn assert_reports_match(actual: Value, expected: Value, fixture: &str) {
    let actual = normalize_nondeterministic(actual);
    let expected = normalize_nondeterministic(expected);
    assert!(
        actual == expected,
        "report mismatch for fixture '{fixture}'.\n\nActual:\n{}\n\nExpected:\n{}",
        pretty(&actual),
        pretty(&expected)
    );
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
