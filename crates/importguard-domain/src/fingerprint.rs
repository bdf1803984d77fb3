use crate::model::Violation;
use importguard_types::ids;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a violation.
///
/// Identity fields:
/// - check_id
/// - code
/// - file path (repo-relative)
/// - specifier
/// - start offset
pub fn fingerprint_for_violation(violation: &Violation) -> String {
    let start = violation.range.start.to_string();
    let parts = [
        ids::CHECK_IMPORTS_ALLOWED,
        violation.code.as_str(),
        violation.file.as_str(),
        violation.specifier.as_str(),
        start.as_str(),
    ];
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
