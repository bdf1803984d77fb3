//! Fuzz target for policy evaluation.
//!
//! Arbitrary rules (invalid globs included) and imports: evaluation must not
//! panic, must be deterministic, and reports at most one violation per import.
//!
//! ```bash
//! cargo +nightly fuzz run fuzz_policy_evaluate
//! ```

#![no_main]

use arbitrary::Arbitrary;
use importguard_domain::{FileIdentity, ImportOccurrence, PolicyConfig, PolicyEngine, PolicyRule};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Rule {
    file_pattern: String,
    allowed: Vec<String>,
}

#[derive(Arbitrary, Debug)]
struct Import {
    specifier: String,
    pos: i64,
    end: i64,
}

#[derive(Arbitrary, Debug)]
struct EvalInput {
    rules: Vec<Rule>,
    path: String,
    imports: Vec<Import>,
}

fuzz_target!(|input: EvalInput| {
    if input.rules.len() > 16 || input.imports.len() > 64 {
        return;
    }

    let rules = input
        .rules
        .into_iter()
        .filter(|r| r.file_pattern.len() <= 256 && r.allowed.len() <= 16)
        .map(|r| PolicyRule::new(r.file_pattern, r.allowed))
        .collect();
    let engine = PolicyEngine::new(&PolicyConfig::new(rules));

    let file = FileIdentity::new(input.path.as_str());
    let imports: Vec<ImportOccurrence> = input
        .imports
        .into_iter()
        .map(|i| ImportOccurrence::from_offsets(i.specifier, i.pos, i.end))
        .collect();

    let first = engine.evaluate(&file, &imports);
    let second = engine.evaluate(&file, &imports);
    assert_eq!(first, second);
    assert!(first.len() <= imports.len());
});
