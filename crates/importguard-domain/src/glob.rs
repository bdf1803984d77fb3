use globset::{GlobBuilder, GlobMatcher};

/// A policy glob compiled once per session.
///
/// Patterns that fail to compile never match anything, which makes a broken
/// config stricter rather than aborting analysis.
#[derive(Clone, Debug)]
pub(crate) struct CompiledGlob {
    pattern: String,
    matcher: Option<GlobMatcher>,
}

impl CompiledGlob {
    pub(crate) fn new(pattern: &str) -> Self {
        // `*` stays within one path segment; `**` crosses segments.
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .ok()
            .map(|glob| glob.compile_matcher());
        Self {
            pattern: pattern.to_string(),
            matcher,
        }
    }

    pub(crate) fn pattern(&self) -> &str {
        &self.pattern
    }

    pub(crate) fn is_match(&self, candidate: &str) -> bool {
        self.matcher
            .as_ref()
            .is_some_and(|m| m.is_match(candidate))
    }
}
