use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use importguard_types::RepoPath;
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into, regardless of include patterns.
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules"];

/// Discover source files under `repo_root`.
///
/// A file is kept when its repo-relative path matches any `include` glob and
/// no `exclude` glob. Output is sorted and deduplicated.
pub fn discover_sources(
    repo_root: &Utf8Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<RepoPath>> {
    let include_set = build_globset(include).context("compile include globset")?;
    let exclude_set = build_globset(exclude).context("compile exclude globset")?;

    let mut out: Vec<RepoPath> = Vec::new();
    for entry in WalkDir::new(repo_root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable path");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let abs = match Utf8PathBuf::from_path_buf(entry.into_path()) {
            Ok(abs) => abs,
            Err(path) => {
                tracing::warn!(path = %path.display(), "skipping non-UTF-8 path");
                continue;
            }
        };
        let rel = RepoPath::relative_to(repo_root, &abs);
        if include_set.is_match(rel.as_str()) && !exclude_set.is_match(rel.as_str()) {
            out.push(rel);
        }
    }

    out.sort();
    out.dedup();
    tracing::debug!(root = %repo_root, files = out.len(), "discovered sources");
    Ok(out)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        let glob = GlobBuilder::new(p)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob: {p}"))?;
        b.add(glob);
    }
    Ok(b.build()?)
}
