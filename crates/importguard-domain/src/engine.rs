use crate::glob::CompiledGlob;
use crate::model::{FileIdentity, ImportOccurrence, PolicyConfig, Violation};
use importguard_types::{RepoPath, Severity, ViolationCode, ids};

/// Message for files that no rule (or only empty rules) cover.
pub const UNCONFIGURED_MESSAGE: &str = "No imports specified for current file. \
Use `imports` option in importguard config (the [imports] table of importguard.toml \
or the plugin entry in tsconfig.json)";

/// Message for an import outside a non-empty allow-list; lists every allowed pattern.
pub fn disallowed_message(allowed: &[String]) -> String {
    format!(
        "Import not allowed. Only imports below allowed from this file: \n{}\n",
        allowed.join(", \n")
    )
}

#[derive(Clone, Debug)]
struct CompiledRule {
    files: CompiledGlob,
    allowed: Vec<CompiledGlob>,
}

/// Policy table with its globs compiled, reusable across files of one session.
///
/// Holds no mutable state; sharing one engine between threads is fine.
#[derive(Clone, Debug)]
pub struct PolicyEngine {
    rules: Vec<CompiledRule>,
}

impl PolicyEngine {
    pub fn new(config: &PolicyConfig) -> Self {
        let rules = config
            .rules
            .iter()
            .map(|rule| CompiledRule {
                files: CompiledGlob::new(&rule.file_pattern),
                allowed: rule
                    .allowed_imports
                    .iter()
                    .map(|p| CompiledGlob::new(p))
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Union of allow-lists of every rule covering `path`: rule order, then
    /// pattern order, duplicates kept.
    fn allowed_for(&self, path: &RepoPath) -> Vec<&CompiledGlob> {
        self.rules
            .iter()
            .filter(|rule| rule.files.is_match(path.as_str()))
            .flat_map(|rule| rule.allowed.iter())
            .collect()
    }

    /// The allowed import patterns for a file, as they would appear in a message.
    pub fn allowed_patterns(&self, path: &RepoPath) -> Vec<String> {
        self.allowed_for(path)
            .into_iter()
            .map(|g| g.pattern().to_string())
            .collect()
    }

    /// Check one file's imports. Output order follows `imports`.
    pub fn evaluate(&self, file: &FileIdentity, imports: &[ImportOccurrence]) -> Vec<Violation> {
        let allowed = self.allowed_for(&file.path);
        let mut out = Vec::new();

        for import in imports {
            let Some(range) = import.range else { continue };

            let is_allowed =
                !allowed.is_empty() && allowed.iter().any(|g| g.is_match(&import.specifier));
            if is_allowed {
                continue;
            }

            let (code, message, patterns) = if allowed.is_empty() {
                (
                    ViolationCode::Unconfigured,
                    UNCONFIGURED_MESSAGE.to_string(),
                    Vec::new(),
                )
            } else {
                let patterns: Vec<String> =
                    allowed.iter().map(|g| g.pattern().to_string()).collect();
                (
                    ViolationCode::Disallowed,
                    disallowed_message(&patterns),
                    patterns,
                )
            };

            out.push(Violation {
                file: file.path.clone(),
                range,
                specifier: import.specifier.clone(),
                message,
                severity: Severity::Error,
                code,
                source: ids::SOURCE.to_string(),
                allowed: patterns,
            });
        }

        out
    }
}

/// Evaluate one file against `config`.
///
/// Compiles the policy on every call; hosts checking many files should build a
/// [`PolicyEngine`] once and call [`PolicyEngine::evaluate`].
pub fn evaluate(
    config: &PolicyConfig,
    file: &FileIdentity,
    imports: &[ImportOccurrence],
) -> Vec<Violation> {
    PolicyEngine::new(config).evaluate(file, imports)
}
