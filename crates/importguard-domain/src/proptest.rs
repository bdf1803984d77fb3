//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - classification of unconfigured / allowed / disallowed imports
//! - union semantics across overlapping rules
//! - unknown positions, idempotence, and output ordering

use crate::engine::{PolicyEngine, evaluate};
use crate::model::{FileIdentity, ImportOccurrence, PolicyConfig, PolicyRule};
use importguard_types::{SourceRange, ViolationCode};
use proptest::prelude::*;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Strategy for repo-relative source file paths.
fn arb_file_path() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,8}(/[a-z]{1,8}){0,3}\\.(ts|tsx|js)")
        .unwrap()
}

/// Strategy for import specifiers: bare packages, scoped packages, and relative paths.
fn arb_specifier() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-z][a-z0-9-]{0,12}").unwrap(),
        prop::string::string_regex("@[a-z]{1,6}/[a-z]{1,8}").unwrap(),
        prop::string::string_regex("\\.{1,2}/[a-z]{1,8}(/[a-z]{1,8}){0,2}").unwrap(),
    ]
}

/// Specifiers that can never match a pattern from `arb_literal_pattern`.
fn arb_numeric_specifier() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9]{1,6}").unwrap()
}

/// Literal (wildcard-free) allow patterns.
fn arb_literal_pattern() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z-]{0,10}").unwrap()
}

/// Occurrences with distinct, increasing start offsets.
fn located(specifiers: Vec<String>) -> Vec<ImportOccurrence> {
    specifiers
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let start = i * 100;
            let end = start + s.len();
            ImportOccurrence::new(s, SourceRange::new(start, end))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Files that no rule covers get exactly one code-1 violation per located import.
    #[test]
    fn uncovered_file_flags_every_import(
        path in arb_file_path(),
        specs in prop::collection::vec(arb_specifier(), 0..8),
    ) {
        let imports = located(specs);
        let out = evaluate(&PolicyConfig::default(), &FileIdentity::new(path.as_str()), &imports);

        prop_assert_eq!(out.len(), imports.len());
        prop_assert!(out.iter().all(|v| v.code == ViolationCode::Unconfigured));
    }

    /// A catch-all allow pattern silences every import.
    #[test]
    fn allowed_imports_are_silent(
        path in arb_file_path(),
        specs in prop::collection::vec(arb_specifier(), 0..8),
    ) {
        let cfg = PolicyConfig::new(vec![PolicyRule::new("**", ["**"])]);
        let out = evaluate(&cfg, &FileIdentity::new(path.as_str()), &located(specs));
        prop_assert!(out.is_empty());
    }

    /// Unmatched imports under a non-empty allow-list get code 2 naming every pattern.
    #[test]
    fn disallowed_lists_every_pattern(
        path in arb_file_path(),
        patterns in prop::collection::vec(arb_literal_pattern(), 1..5),
        spec in arb_numeric_specifier(),
    ) {
        let cfg = PolicyConfig::new(vec![PolicyRule::new("**", patterns.clone())]);
        let out = evaluate(&cfg, &FileIdentity::new(path.as_str()), &located(vec![spec]));

        prop_assert_eq!(out.len(), 1);
        prop_assert_eq!(out[0].code, ViolationCode::Disallowed);
        for p in &patterns {
            prop_assert!(out[0].message.contains(p.as_str()));
        }
        prop_assert_eq!(&out[0].allowed, &patterns);
    }

    /// An import allowed by either of two overlapping rules is allowed.
    #[test]
    fn overlapping_rules_union(
        path in arb_file_path(),
        a in arb_literal_pattern(),
        b in arb_literal_pattern(),
        pick_first in any::<bool>(),
    ) {
        let cfg = PolicyConfig::new(vec![
            PolicyRule::new("**", [a.clone()]),
            PolicyRule::new("**/*", [b.clone()]),
        ]);
        let spec = if pick_first { a } else { b };
        let out = evaluate(&cfg, &FileIdentity::new(path.as_str()), &located(vec![spec]));
        prop_assert!(out.is_empty());
    }

    /// Imports without a position never produce violations.
    #[test]
    fn unknown_positions_are_never_reported(
        path in arb_file_path(),
        specs in prop::collection::vec(arb_specifier(), 0..8),
        end in -5i64..50,
    ) {
        let imports: Vec<ImportOccurrence> = specs
            .into_iter()
            .map(|s| ImportOccurrence::from_offsets(s, -1, end))
            .collect();
        let out = evaluate(&PolicyConfig::default(), &FileIdentity::new(path.as_str()), &imports);
        prop_assert!(out.is_empty());
    }

    /// Same inputs, same outputs.
    #[test]
    fn evaluation_is_idempotent(
        path in arb_file_path(),
        patterns in prop::collection::vec(arb_literal_pattern(), 0..4),
        specs in prop::collection::vec(arb_specifier(), 0..8),
    ) {
        let cfg = PolicyConfig::new(vec![PolicyRule::new("**", patterns)]);
        let engine = PolicyEngine::new(&cfg);
        let file = FileIdentity::new(path.as_str());
        let imports = located(specs);

        let first = engine.evaluate(&file, &imports);
        let second = engine.evaluate(&file, &imports);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, evaluate(&cfg, &file, &imports));
    }

    /// Violations keep the relative order of their imports.
    #[test]
    fn output_preserves_import_order(
        path in arb_file_path(),
        specs in prop::collection::vec(arb_specifier(), 0..12),
    ) {
        let cfg = PolicyConfig::new(vec![PolicyRule::new("**", ["./*"])]);
        let out = evaluate(&cfg, &FileIdentity::new(path.as_str()), &located(specs));
        let starts: Vec<usize> = out.iter().map(|v| v.range.start).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        prop_assert_eq!(starts, sorted);
    }

    /// Arbitrary (possibly malformed) patterns never panic.
    #[test]
    fn arbitrary_patterns_never_panic(
        file_pattern in ".{0,16}",
        allowed in prop::collection::vec(".{0,16}", 0..4),
        spec in ".{0,16}",
    ) {
        let cfg = PolicyConfig::new(vec![PolicyRule::new(file_pattern, allowed)]);
        let _ = evaluate(&cfg, &FileIdentity::new("src/a.ts"), &located(vec![spec]));
    }
}
