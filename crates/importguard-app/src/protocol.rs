//! JSON host protocol, for hosts that run importguard as a subprocess.
//!
//! Request (stdin):
//!
//! ```json
//! { "file": "src/ui/Button.tsx",
//!   "imports": [{ "text": "lodash", "pos": 40, "end": 48 }],
//!   "diagnostics": [] }
//! ```
//!
//! Response (stdout): `{ "diagnostics": [...] }`, the request's diagnostics
//! minus earlier importguard entries, plus the fresh ones. A negative `pos`
//! marks an import with no source position; it is never reported.

use crate::host::{Diagnostic, merge_diagnostics};
use camino::{Utf8Path, Utf8PathBuf};
use importguard_domain::{FileIdentity, ImportOccurrence, PolicyConfig, PolicyEngine};
use importguard_types::RepoPath;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum HostProtocolError {
    #[error("malformed host request")]
    Malformed(#[source] serde_json::Error),
    #[error("host request has an empty `file`")]
    EmptyFile,
    #[error("failed to encode host response")]
    Encode(#[source] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostImport {
    /// Specifier text without quotes.
    pub text: String,
    pub pos: i64,
    pub end: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRequest {
    pub file: String,
    #[serde(default)]
    pub imports: Vec<HostImport>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostResponse {
    pub diagnostics: Vec<Diagnostic>,
}

pub fn decode_request(text: &str) -> Result<HostRequest, HostProtocolError> {
    let request: HostRequest = serde_json::from_str(text).map_err(HostProtocolError::Malformed)?;
    if request.file.trim().is_empty() {
        return Err(HostProtocolError::EmptyFile);
    }
    Ok(request)
}

pub fn encode_response(response: &HostResponse) -> Result<String, HostProtocolError> {
    serde_json::to_string(response).map_err(HostProtocolError::Encode)
}

/// One compiled policy serving any number of requests.
#[derive(Clone, Debug)]
pub struct HostSession {
    engine: PolicyEngine,
    repo_root: Utf8PathBuf,
}

impl HostSession {
    /// `repo_root` relativizes absolute request paths before glob matching.
    pub fn new(config: &PolicyConfig, repo_root: &Utf8Path) -> Self {
        Self {
            engine: PolicyEngine::new(config),
            repo_root: repo_root.to_path_buf(),
        }
    }

    pub fn handle(&self, request: HostRequest) -> HostResponse {
        let identity = FileIdentity::new(RepoPath::relative_to(
            &self.repo_root,
            Utf8Path::new(&request.file),
        ));
        let imports: Vec<ImportOccurrence> = request
            .imports
            .into_iter()
            .map(|i| ImportOccurrence::from_offsets(i.text, i.pos, i.end))
            .collect();
        let violations = self.engine.evaluate(&identity, &imports);
        tracing::debug!(
            file = %identity.path,
            imports = imports.len(),
            violations = violations.len(),
            "host request evaluated"
        );

        HostResponse {
            diagnostics: merge_diagnostics(&request.file, request.diagnostics, &violations),
        }
    }

    /// Decode, evaluate, encode.
    pub fn handle_json(&self, text: &str) -> Result<String, HostProtocolError> {
        let request = decode_request(text)?;
        encode_response(&self.handle(request))
    }
}
