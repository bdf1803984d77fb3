//! Source adapters: discover JS/TS files, read them, and extract their imports.
//!
//! This crate is allowed to do filesystem IO. It plays the host role for the
//! CLI: it hands the engine a file identity plus located import occurrences.

#![forbid(unsafe_code)]

mod discover;
mod lexer;
mod line_index;

use anyhow::Context;
use camino::Utf8Path;
use importguard_domain::ImportOccurrence;
use importguard_types::RepoPath;
use rayon::prelude::*;

pub use discover::discover_sources;
pub use lexer::extract_imports;
pub use line_index::LineIndex;

/// File extensions that compile JSX.
const JSX_EXTENSIONS: &[&str] = &["tsx", "jsx"];

/// One source file with its imports, ready for evaluation.
#[derive(Clone, Debug)]
pub struct ScannedFile {
    pub path: RepoPath,
    pub text: String,
    pub imports: Vec<ImportOccurrence>,
    pub lines: LineIndex,
}

impl ScannedFile {
    /// 1-based line and column for a byte offset.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        self.lines.line_col(&self.text, offset)
    }
}

/// Extract imports from one file's text.
///
/// With an automatic JSX runtime, `.tsx`/`.jsx` files also import
/// `<jsx_import_source>/jsx-runtime`. That import has no position in the
/// source, so it is recorded unlocated and never reported.
pub fn scan_source(
    path: &RepoPath,
    text: &str,
    jsx_import_source: Option<&str>,
) -> Vec<ImportOccurrence> {
    let mut imports = extract_imports(text);
    if let Some(source) = jsx_import_source
        && path
            .extension()
            .is_some_and(|ext| JSX_EXTENSIONS.contains(&ext.as_str()))
    {
        imports.push(ImportOccurrence::unlocated(format!("{source}/jsx-runtime")));
    }
    imports
}

/// Read and scan `files` (repo-relative) in parallel. Output order matches `files`.
pub fn scan_files(
    repo_root: &Utf8Path,
    files: &[RepoPath],
    jsx_import_source: Option<&str>,
) -> anyhow::Result<Vec<ScannedFile>> {
    files
        .par_iter()
        .map(|path| {
            let abs = repo_root.join(path.as_str());
            let bytes = std::fs::read(&abs).with_context(|| format!("read {}", abs))?;
            let text = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(file = %path, "file is not valid UTF-8; decoding lossily");
                    String::from_utf8_lossy(err.as_bytes()).into_owned()
                }
            };
            let imports = scan_source(path, &text, jsx_import_source);
            tracing::debug!(file = %path, imports = imports.len(), "scanned");
            let lines = LineIndex::new(&text);
            Ok(ScannedFile {
                path: path.clone(),
                text,
                imports,
                lines,
            })
        })
        .collect()
}
