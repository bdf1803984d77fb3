use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Half-open offset range `[start, end)` into a file's source text.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    JsonSchema,
)]
pub struct SourceRange {
    pub start: usize,
    pub end: usize,
}

impl SourceRange {
    /// Build a range, clamping `end < start` to an empty range at `start`.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Interpret host-supplied signed offsets.
    ///
    /// A negative `start` means the host could not locate the token and yields `None`.
    pub fn from_offsets(start: i64, end: i64) -> Option<Self> {
        let start = usize::try_from(start).ok()?;
        let end = usize::try_from(end).unwrap_or(start);
        Some(Self::new(start, end))
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
