use crate::model::{FileIdentity, ImportOccurrence, PolicyConfig, PolicyRule};
use importguard_types::SourceRange;

pub fn file(path: &str) -> FileIdentity {
    FileIdentity::new(path)
}

pub fn import_at(specifier: &str, start: usize, end: usize) -> ImportOccurrence {
    ImportOccurrence::new(specifier, SourceRange::new(start, end))
}

/// `src/ui/**` may import `react` and sibling stylesheets.
pub fn ui_config() -> PolicyConfig {
    PolicyConfig::new(vec![PolicyRule::new("src/ui/**", ["react", "./*.css"])])
}
