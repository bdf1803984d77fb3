//! Editor-host adapter.
//!
//! A host (a language server, an editor plugin) exposes its analysis through
//! [`LanguageService`]. [`ImportPolicyService`] wraps one and adds the import
//! policy to its semantic diagnostics, leaving every other query untouched.

use importguard_domain::{
    FileIdentity, ImportOccurrence, PolicyConfig, PolicyEngine, Violation,
};
use importguard_types::{RepoPath, Severity, ids};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

impl From<Severity> for DiagnosticCategory {
    fn from(value: Severity) -> Self {
        match value {
            Severity::Info => DiagnosticCategory::Message,
            Severity::Warning => DiagnosticCategory::Warning,
            Severity::Error => DiagnosticCategory::Error,
        }
    }
}

/// A host diagnostic, in the shape editors consume.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: Option<usize>,
    pub length: Option<usize>,
    pub message: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Producer tag. Diagnostics tagged [`ids::SOURCE`] belong to importguard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Diagnostic {
    pub fn from_violation(file: &str, v: &Violation) -> Self {
        Self {
            file: file.to_string(),
            start: Some(v.range.start),
            length: Some(v.range.len()),
            message: v.message.clone(),
            category: v.severity.into(),
            code: u32::from(v.code.as_u8()),
            source: Some(v.source.clone()),
        }
    }

    pub fn is_importguard(&self) -> bool {
        self.source.as_deref() == Some(ids::SOURCE)
    }
}

/// Drop importguard's earlier diagnostics from `prior` and append fresh ones.
///
/// Everything else in `prior` is kept, in its original order.
pub fn merge_diagnostics(file: &str, prior: Vec<Diagnostic>, fresh: &[Violation]) -> Vec<Diagnostic> {
    let mut out: Vec<Diagnostic> = prior.into_iter().filter(|d| !d.is_importguard()).collect();
    out.extend(fresh.iter().map(|v| Diagnostic::from_violation(file, v)));
    out
}

/// What the host knows about one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    /// Path the policy globs are matched against.
    pub path: RepoPath,
    /// Imports as the host's parser located them.
    pub imports: Vec<ImportOccurrence>,
}

pub trait LanguageService {
    fn source_file(&self, file: &str) -> Option<SourceFile>;
    fn syntactic_diagnostics(&self, file: &str) -> Vec<Diagnostic>;
    fn semantic_diagnostics(&self, file: &str) -> Vec<Diagnostic>;
    fn file_names(&self) -> Vec<String>;
}

/// Decorator adding import-policy diagnostics to a host service.
#[derive(Debug)]
pub struct ImportPolicyService<S> {
    inner: S,
    engine: PolicyEngine,
}

impl<S: LanguageService> ImportPolicyService<S> {
    pub fn new(inner: S, config: &PolicyConfig) -> Self {
        Self {
            inner,
            engine: PolicyEngine::new(config),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: LanguageService> LanguageService for ImportPolicyService<S> {
    fn source_file(&self, file: &str) -> Option<SourceFile> {
        self.inner.source_file(file)
    }

    fn syntactic_diagnostics(&self, file: &str) -> Vec<Diagnostic> {
        self.inner.syntactic_diagnostics(file)
    }

    fn semantic_diagnostics(&self, file: &str) -> Vec<Diagnostic> {
        let prior = self.inner.semantic_diagnostics(file);
        let Some(source) = self.inner.source_file(file) else {
            // Unknown to the host: nothing to check, but stale entries still go.
            return merge_diagnostics(file, prior, &[]);
        };
        let violations = self
            .engine
            .evaluate(&FileIdentity::new(source.path), &source.imports);
        tracing::debug!(file, violations = violations.len(), "import policy evaluated");
        merge_diagnostics(file, prior, &violations)
    }

    fn file_names(&self) -> Vec<String> {
        self.inner.file_names()
    }
}
