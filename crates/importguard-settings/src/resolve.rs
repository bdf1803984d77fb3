use crate::model::{ImportguardConfigV1, SCHEMA_CONFIG_V1};
use anyhow::Context;
use globset::Glob;
use importguard_domain::{PolicyConfig, PolicyRule};

pub const DEFAULT_INCLUDE: &[&str] = &["**/*.{ts,tsx,mts,cts,js,jsx,mjs,cjs}"];
pub const DEFAULT_EXCLUDE: &[&str] = &["**/node_modules/**"];
pub const DEFAULT_MAX_FINDINGS: usize = 200;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub max_findings: Option<u32>,
    /// Replaces the configured include globs when non-empty.
    pub include: Vec<String>,
    /// Added to the configured exclude globs.
    pub exclude: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub policy: PolicyConfig,
    pub max_findings: usize,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub jsx_import_source: Option<String>,
}

pub fn resolve_config(
    cfg: ImportguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    // `[imports]` first (document order), then `[[rules]]`.
    let mut rules: Vec<PolicyRule> = cfg
        .imports
        .iter()
        .map(|(files, allow)| PolicyRule::new(files, allow.iter().cloned()))
        .collect();
    rules.extend(
        cfg.rules
            .into_iter()
            .map(|r| PolicyRule::new(r.files, r.allow)),
    );
    for rule in &rules {
        validate_rule(rule)?;
    }

    let include = if !overrides.include.is_empty() {
        overrides.include
    } else if !cfg.include.is_empty() {
        cfg.include
    } else {
        DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect()
    };
    validate_globs("include", &include)?;

    let mut exclude = if cfg.exclude.is_empty() {
        DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect()
    } else {
        cfg.exclude
    };
    exclude.extend(overrides.exclude);
    validate_globs("exclude", &exclude)?;

    let max_findings = overrides
        .max_findings
        .or(cfg.max_findings)
        .map(|n| n as usize)
        .unwrap_or(DEFAULT_MAX_FINDINGS);

    Ok(ResolvedConfig {
        policy: PolicyConfig::new(rules),
        max_findings,
        include,
        exclude,
        jsx_import_source: cfg.jsx_import_source.filter(|s| !s.trim().is_empty()),
    })
}

/// Empty patterns are rejected. Malformed globs are kept: the engine treats
/// them as matching nothing, so a typo only makes the policy stricter.
fn validate_rule(rule: &PolicyRule) -> anyhow::Result<()> {
    if rule.file_pattern.trim().is_empty() {
        anyhow::bail!("import rule has an empty file pattern");
    }
    warn_if_malformed(&rule.file_pattern, "file pattern");

    for pattern in &rule.allowed_imports {
        if pattern.trim().is_empty() {
            anyhow::bail!(
                "import rule for {} has an empty allowed pattern",
                rule.file_pattern
            );
        }
        warn_if_malformed(pattern, "allowed import pattern");
    }
    Ok(())
}

fn warn_if_malformed(pattern: &str, what: &str) {
    if let Err(err) = Glob::new(pattern) {
        tracing::warn!(pattern, error = %err, "invalid {what}; it will match nothing");
    }
}

fn validate_globs(what: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern).with_context(|| format!("invalid {what} glob: {pattern}"))?;
    }
    Ok(())
}
