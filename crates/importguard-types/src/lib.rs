//! Stable DTOs and IDs used across the importguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report
//! - stable string IDs and the numeric violation codes
//! - canonical repo-relative path handling and source ranges
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod code;
pub mod explain;
pub mod ids;
pub mod path;
pub mod range;
pub mod receipt;

pub use code::{UnknownViolationCode, ViolationCode};
pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use path::RepoPath;
pub use range::SourceRange;
pub use receipt::{
    Finding, ImportguardData, ImportguardReport, Location, ReportEnvelope, RunMeta,
    SCHEMA_REPORT_V1, Severity, ToolMeta, Verdict, VerdictCounts, VerdictStatus,
};
