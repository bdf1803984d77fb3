//! Config parsing and policy resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;
mod tsconfig;

pub use model::{ImportMap, ImportguardConfigV1, RuleConfig, SCHEMA_CONFIG_V1};
pub use resolve::{
    DEFAULT_EXCLUDE, DEFAULT_INCLUDE, DEFAULT_MAX_FINDINGS, Overrides, ResolvedConfig,
};
pub use tsconfig::PLUGIN_NAMES;

/// Parse `importguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<ImportguardConfigV1> {
    let cfg: ImportguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Parse a `tsconfig.json` (comments and trailing commas allowed) or a bare
/// plugin entry, extracting the import policy from the plugin block.
pub fn parse_tsconfig_json(input: &str) -> anyhow::Result<ImportguardConfigV1> {
    tsconfig::parse_tsconfig_json(input)
}

/// Resolve the effective config used by the scanner and the engine.
pub fn resolve_config(
    cfg: ImportguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
