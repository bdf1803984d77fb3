//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

/// Tag carried by every diagnostic this engine produces. Hosts use it to
/// replace the engine's earlier output on re-analysis instead of duplicating it.
pub const SOURCE: &str = "importguard";

// Checks
pub const CHECK_IMPORTS_ALLOWED: &str = "imports.allowed";

// Codes: imports.allowed
pub const CODE_UNCONFIGURED: &str = "unconfigured";
pub const CODE_DISALLOWED: &str = "disallowed";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
