//! Import policy embedded in `tsconfig.json` as a language-service plugin entry:
//!
//! ```json
//! { "compilerOptions": { "plugins": [
//!     { "name": "ts-allow-imports-plugin", "imports": { "src/ui/**": ["react"] } }
//! ] } }
//! ```

use crate::model::{ImportMap, ImportguardConfigV1};
use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;

/// Plugin names recognised in `compilerOptions.plugins`.
pub const PLUGIN_NAMES: &[&str] = &["ts-allow-imports-plugin", "importguard"];

#[derive(Deserialize)]
struct PluginEntry {
    #[serde(default)]
    imports: ImportMap,
}

pub fn parse_tsconfig_json(input: &str) -> anyhow::Result<ImportguardConfigV1> {
    let cleaned = strip_jsonc(input);
    let doc: Value = serde_json::from_str(&cleaned).context("parse tsconfig json")?;

    let Some(options) = doc.get("compilerOptions") else {
        // Bare plugin entry.
        let entry: PluginEntry =
            serde_json::from_value(doc).context("parse plugin entry")?;
        return Ok(ImportguardConfigV1 {
            imports: entry.imports,
            ..ImportguardConfigV1::default()
        });
    };

    let plugin = options
        .get("plugins")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find(|p| {
            p.get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| PLUGIN_NAMES.contains(&name))
        })
        .cloned()
        .with_context(|| {
            format!(
                "no plugin named {} in compilerOptions.plugins",
                PLUGIN_NAMES.join(" or ")
            )
        })?;
    let entry: PluginEntry = serde_json::from_value(plugin).context("parse plugin entry")?;

    Ok(ImportguardConfigV1 {
        imports: entry.imports,
        jsx_import_source: jsx_import_source(options),
        ..ImportguardConfigV1::default()
    })
}

/// The automatic JSX runtime makes the compiler import `<source>/jsx-runtime`.
fn jsx_import_source(options: &Value) -> Option<String> {
    let jsx = options.get("jsx").and_then(Value::as_str)?;
    if !matches!(jsx, "react-jsx" | "react-jsxdev") {
        return None;
    }
    let source = options
        .get("jsxImportSource")
        .and_then(Value::as_str)
        .unwrap_or("react");
    Some(source.to_string())
}

/// Drop `//` and `/* */` comments, then trailing commas, outside string literals.
fn strip_jsonc(input: &str) -> String {
    strip_trailing_commas(&strip_comments(input))
}

/// Byte index just past the string literal opening at `start`.
fn string_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn strip_comments(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    let mut last_copied = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = string_end(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                out.push_str(&input[last_copied..i]);
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                last_copied = i;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                out.push_str(&input[last_copied..i]);
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
                // Keep tokens on either side of the comment apart.
                out.push(' ');
                last_copied = i;
            }
            _ => i += 1,
        }
    }
    out.push_str(&input[last_copied.min(input.len())..]);
    out
}

fn strip_trailing_commas(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    let mut last_copied = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = string_end(bytes, i),
            b',' => {
                let rest = &bytes[i + 1..];
                let next = rest.iter().position(|c| !c.is_ascii_whitespace());
                if next.is_some_and(|n| matches!(rest[n], b'}' | b']')) {
                    out.push_str(&input[last_copied..i]);
                    last_copied = i + 1;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    out.push_str(&input[last_copied.min(input.len())..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_plugin_block_in_order() {
        let cfg = parse_tsconfig_json(
            r#"{
              // editor plugin
              "compilerOptions": {
                "strict": true,
                "plugins": [
                  { "name": "other-plugin" },
                  {
                    "name": "ts-allow-imports-plugin",
                    "imports": {
                      "src/ui/**": ["react", "./*.css"],
                      "src/**": ["lodash"], /* shared */
                    },
                  },
                ],
              },
            }"#,
        )
        .expect("parse");

        let keys: Vec<&str> = cfg.imports.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["src/ui/**", "src/**"]);
        assert_eq!(cfg.imports.0[0].1, vec!["react", "./*.css"]);
        assert_eq!(cfg.jsx_import_source, None);
    }

    #[test]
    fn accepts_bare_plugin_entry() {
        let cfg = parse_tsconfig_json(r#"{ "name": "importguard", "imports": { "*": [] } }"#)
            .expect("parse");
        assert_eq!(cfg.imports.0, vec![("*".to_string(), Vec::new())]);
    }

    #[test]
    fn missing_plugin_is_an_error() {
        let err = parse_tsconfig_json(r#"{ "compilerOptions": { "plugins": [] } }"#)
            .expect_err("no plugin");
        assert!(format!("{err:#}").contains("ts-allow-imports-plugin"));
    }

    #[test]
    fn automatic_jsx_runtime_sets_import_source() {
        let cfg = parse_tsconfig_json(
            r#"{ "compilerOptions": {
                "jsx": "react-jsx",
                "jsxImportSource": "preact",
                "plugins": [{ "name": "importguard", "imports": {} }]
            } }"#,
        )
        .expect("parse");
        assert_eq!(cfg.jsx_import_source.as_deref(), Some("preact"));

        let cfg = parse_tsconfig_json(
            r#"{ "compilerOptions": {
                "jsx": "preserve",
                "plugins": [{ "name": "importguard" }]
            } }"#,
        )
        .expect("parse");
        assert_eq!(cfg.jsx_import_source, None);
    }

    #[test]
    fn comment_markers_inside_strings_survive() {
        let out = strip_jsonc(r#"{ "a": "http://x/*y*/", "b": [1, 2,], }"#);
        let v: Value = serde_json::from_str(&out).expect("valid json");
        assert_eq!(v["a"], "http://x/*y*/");
        assert_eq!(v["b"], serde_json::json!([1, 2]));
    }

    #[test]
    fn trailing_comma_before_line_comment() {
        let cfg = parse_tsconfig_json(
            "{\"compilerOptions\":{\"plugins\":[{\"name\":\"importguard\",\"imports\":{\"src/**\":[\"react\"]}}, // policy\n]}}",
        )
        .expect("parse");
        assert_eq!(
            cfg.imports.0,
            vec![("src/**".to_string(), vec!["react".to_string()])]
        );
    }

    #[test]
    fn trailing_comma_before_block_comment() {
        let out = strip_jsonc("[1, 2, /* last */\n]");
        let v: Value = serde_json::from_str(&out).expect("valid json");
        assert_eq!(v, serde_json::json!([1, 2]));
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        let out = strip_jsonc(r#"{ "a": "say \"//hi\"", }"#);
        let v: Value = serde_json::from_str(&out).expect("valid json");
        assert_eq!(v["a"], "say \"//hi\"");
    }
}
