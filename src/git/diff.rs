//! Staged diff data and exclusion rules.

use globset::{Glob, GlobSet, GlobSetBuilder};

/// Changes staged for the next commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedDiff {
    /// Paths of the staged files, relative to the repository root.
    pub files: Vec<String>,
    /// Unified diff of the staged changes.
    pub diff: String,
}

/// Glob patterns of staged files left out of the diff.
#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
    set: GlobSet,
}

impl ExcludeMatcher {
    /// Compiles the given patterns.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, globset::Error> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern.as_ref())?);
        }
        Ok(Self {
            set: builder.build()?,
        })
    }

    /// Matcher that excludes nothing.
    pub fn none() -> Self {
        Self {
            set: GlobSet::empty(),
        }
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.set.is_match(path)
    }
}
