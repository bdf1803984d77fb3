//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after config examples.
    pub examples: ExamplePair,
}

/// Before and after config examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Config that would trigger a finding.
    pub before: &'static str,
    /// Config that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Numeric diagnostic codes (`1`, `2`) are accepted as aliases of their
/// snake_case codes. Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Check IDs
        ids::CHECK_IMPORTS_ALLOWED => Some(explain_imports_allowed()),

        // Codes
        ids::CODE_UNCONFIGURED | "1" => Some(explain_unconfigured()),
        ids::CODE_DISALLOWED | "2" => Some(explain_disallowed()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[ids::CHECK_IMPORTS_ALLOWED]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[ids::CODE_UNCONFIGURED, ids::CODE_DISALLOWED]
}

// --- Check-level explanations ---

fn explain_imports_allowed() -> Explanation {
    Explanation {
        title: "Allowed Imports",
        description: "\
Checks every import specifier of every file against the import policy.

The policy maps file globs to lists of allowed import globs. All rules whose
file glob matches a file are combined; an import is accepted when any allowed
glob of those rules matches its specifier. A file that no rule covers may not
import anything.

Rules are additive: overlapping rules never override each other, they only
widen what a file may import.",
        remediation: "\
Either remove the import, or extend the policy for the file:

    [imports]
    \"src/ui/**\" = [\"react\", \"./*.css\"]

Specifiers are matched as written in the source (`./Button.css`, `react`,
`@scope/pkg/sub`), not as resolved file paths.",
        examples: ExamplePair {
            before: r#"[imports]
"src/ui/**" = ["react"]
# src/ui/Button.ts: import _ from "lodash";"#,
            after: r#"[imports]
"src/ui/**" = ["react", "lodash"]"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_unconfigured() -> Explanation {
    Explanation {
        title: "No Imports Configured",
        description: "\
The file imports something, but no rule covers the file, or every rule that
covers it has an empty allow-list. Such a file is allowed to import nothing.

Reported with diagnostic code 1.",
        remediation: "\
Add a rule whose file glob matches the file and list what it may import:

    [imports]
    \"src/other/**\" = [\"./*\"]

An empty list is treated the same as a missing rule.",
        examples: ExamplePair {
            before: r#"[imports]
"src/ui/**" = ["react"]
# src/other/x.ts is not covered"#,
            after: r#"[imports]
"src/ui/**" = ["react"]
"src/other/**" = ["./*"]"#,
        },
    }
}

fn explain_disallowed() -> Explanation {
    Explanation {
        title: "Import Not Allowed",
        description: "\
The file is covered by at least one rule with a non-empty allow-list, but the
import specifier matches none of the allowed globs.

Reported with diagnostic code 2. The message lists every glob the file may
import, in config order.",
        remediation: "\
Import one of the listed modules instead, or add a glob for this specifier to
a rule that covers the file.

Remember that `*` does not cross `/`; use `**` to allow nested paths, e.g.
`\"./components/**\"`.",
        examples: ExamplePair {
            before: r#"[imports]
"src/ui/**" = ["react", "./*.css"]
# src/ui/Button.ts: import "./theme/dark.css";"#,
            after: r#"[imports]
"src/ui/**" = ["react", "./**/*.css"]"#,
        },
    }
}
