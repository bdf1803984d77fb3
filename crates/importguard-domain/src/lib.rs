//! Pure import-policy evaluation (no IO).
//!
//! Input: a policy table plus one file's identity and import list, supplied by a host.
//! Output: violations in import order.

#![forbid(unsafe_code)]

pub mod fingerprint;
pub mod model;

mod engine;
mod glob;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use engine::{PolicyEngine, disallowed_message, evaluate, UNCONFIGURED_MESSAGE};
pub use model::{FileIdentity, ImportOccurrence, PolicyConfig, PolicyRule, Violation};
