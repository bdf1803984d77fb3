#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Info,
    Warning,
    Error,
}

impl RenderableSeverity {
    pub(crate) fn label(self) -> &'static str {
        match self {
            RenderableSeverity::Info => "info",
            RenderableSeverity::Warning => "warning",
            RenderableSeverity::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableLocation {
    pub path: String,
    pub line: Option<u32>,
    pub col: Option<u32>,
}

impl RenderableLocation {
    /// `path`, `path:line` or `path:line:col`.
    pub(crate) fn display(&self) -> String {
        match (self.line, self.col) {
            (Some(line), Some(col)) => format!("{}:{}:{}", self.path, line, col),
            (Some(line), None) => format!("{}:{}", self.path, line),
            _ => self.path.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableFinding {
    pub severity: RenderableSeverity,
    pub check_id: Option<String>,
    pub code: String,
    /// Numeric diagnostic code (`1`, `2`) for policy findings.
    pub code_number: Option<u8>,
    pub message: String,
    pub location: Option<RenderableLocation>,
    pub help: Option<String>,
    pub url: Option<String>,
}

impl RenderableFinding {
    /// The message on one line, whitespace runs collapsed.
    pub(crate) fn flat_message(&self) -> String {
        self.message.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableData {
    pub files_scanned: u32,
    pub findings_emitted: u32,
    pub findings_total: u32,
    pub truncated_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub findings: Vec<RenderableFinding>,
    pub data: RenderableData,
}
