use importguard_types::{RepoPath, Severity, SourceRange, ViolationCode};
use serde::{Deserialize, Serialize};

/// Policy table, immutable for the lifetime of an analysis session.
///
/// Rule order does not change which imports are allowed (matching rules are
/// unioned), but it fixes the order of patterns in violation messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyConfig {
    pub rules: Vec<PolicyRule>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyRule {
    /// Glob matched against the file's path.
    pub file_pattern: String,
    /// Globs matched against import specifiers of covered files.
    pub allowed_imports: Vec<String>,
}

impl PolicyRule {
    pub fn new<I, S>(file_pattern: impl Into<String>, allowed_imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            file_pattern: file_pattern.into(),
            allowed_imports: allowed_imports.into_iter().map(Into::into).collect(),
        }
    }
}

impl PolicyConfig {
    pub fn new(rules: Vec<PolicyRule>) -> Self {
        Self { rules }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub path: RepoPath,
}

impl FileIdentity {
    pub fn new(path: impl Into<RepoPath>) -> Self {
        Self { path: path.into() }
    }
}

/// One import statement as located by the host's parser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOccurrence {
    /// The module specifier exactly as written.
    pub specifier: String,
    /// Location of the specifier token; `None` when the host could not locate it.
    pub range: Option<SourceRange>,
}

impl ImportOccurrence {
    pub fn new(specifier: impl Into<String>, range: SourceRange) -> Self {
        Self {
            specifier: specifier.into(),
            range: Some(range),
        }
    }

    /// An import the host knows about but cannot place in the source (e.g. synthesized ones).
    pub fn unlocated(specifier: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            range: None,
        }
    }

    /// Build from signed host offsets; a negative start marks an unknown position.
    pub fn from_offsets(specifier: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            specifier: specifier.into(),
            range: SourceRange::from_offsets(start, end),
        }
    }
}

/// A policy breach at one import occurrence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub file: RepoPath,
    pub range: SourceRange,
    pub specifier: String,
    pub message: String,
    pub severity: Severity,
    pub code: ViolationCode,
    pub source: String,
    /// Patterns the file may import, in config order (empty for `Unconfigured`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
}
