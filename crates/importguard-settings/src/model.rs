use schemars::JsonSchema;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub const SCHEMA_CONFIG_V1: &str = "importguard.config.v1";

/// `importguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImportguardConfigV1 {
    /// Optional schema string for tooling (`importguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// How many findings to emit before truncating the report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_findings: Option<u32>,

    /// Globs selecting the files to check (repo-relative).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    /// Globs removing files from the checked set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Module providing the automatic JSX runtime (e.g. `react`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsx_import_source: Option<String>,

    /// Map of file glob -> allowed import globs, in document order.
    #[serde(default)]
    #[schemars(with = "BTreeMap<String, Vec<String>>")]
    pub imports: ImportMap,

    /// Flattened rules, evaluated after `imports`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    /// Glob matched against file paths.
    pub files: String,
    /// Globs matched against import specifiers.
    #[serde(default)]
    pub allow: Vec<String>,
}

/// Ordered `file glob -> allowed globs` mapping.
///
/// A plain map type would sort the keys; the order is kept so violation
/// messages list patterns the way the user wrote them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportMap(pub Vec<(String, Vec<String>)>);

impl ImportMap {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl Serialize for ImportMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ImportMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ImportMapVisitor;

        impl<'de> Visitor<'de> for ImportMapVisitor {
            type Value = ImportMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of file globs to lists of allowed import globs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ImportMap, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry::<String, Vec<String>>()? {
                    entries.push((k, v));
                }
                Ok(ImportMap(entries))
            }
        }

        deserializer.deserialize_map(ImportMapVisitor)
    }
}
