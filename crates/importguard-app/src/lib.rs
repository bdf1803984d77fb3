//! Use case orchestration for importguard.
//!
//! This crate provides the application layer: use cases that coordinate the settings, scan,
//! domain, and render layers, plus the adapters that let an editor host drive the engine.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod host;
mod protocol;
mod render;
mod report;

pub use check::{CheckInput, CheckOutput, ConfigSource, load_policy, run_check, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use host::{
    Diagnostic, DiagnosticCategory, ImportPolicyService, LanguageService, SourceFile,
    merge_diagnostics,
};
pub use protocol::{
    HostImport, HostProtocolError, HostRequest, HostResponse, HostSession, decode_request,
    encode_response,
};
pub use render::{render_annotations, render_markdown, render_text};
pub use report::{
    empty_report, parse_report_json, runtime_error_report, serialize_report, to_renderable,
};
