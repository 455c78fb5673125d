//! Git repository operations

use std::path::Path;

use anyhow::{Context, Result};
use git2::{Commit, DiffDelta, DiffFormat, ErrorCode, Oid, Repository, Tree};
use tracing::debug;

use super::diff::{ExcludeMatcher, StagedDiff};

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open repository at current directory
    pub fn open() -> Result<Self> {
        let repo = Repository::discover(".").context("Not in a git repository")?;

        Ok(Self { repo })
    }

    /// Open repository at specified path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;

        Ok(Self { repo })
    }

    /// Collects the staged changes, leaving out excluded files.
    ///
    /// Returns `None` when nothing (or only excluded files) is staged.
    pub fn staged_diff(&self, excludes: &ExcludeMatcher) -> Result<Option<StagedDiff>> {
        let head_tree = self.head_tree()?;
        let index = self.repo.index().context("Failed to read index")?;

        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)
            .context("Failed to diff HEAD against index")?;

        let files: Vec<String> = diff
            .deltas()
            .filter_map(|delta| delta_path(&delta))
            .filter(|path| !excludes.is_excluded(path))
            .collect();

        if files.is_empty() {
            debug!("No staged changes outside exclude patterns");
            return Ok(None);
        }

        let mut content = String::new();
        diff.print(DiffFormat::Patch, |delta, _hunk, line| {
            if delta_path(&delta).is_some_and(|path| excludes.is_excluded(&path)) {
                return true;
            }
            if matches!(line.origin(), '+' | '-' | ' ') {
                content.push(line.origin());
            }
            content.push_str(&String::from_utf8_lossy(line.content()));
            true
        })
        .context("Failed to format diff")?;

        debug!(files = files.len(), diff_len = content.len(), "Collected staged diff");

        Ok(Some(StagedDiff {
            files,
            diff: content,
        }))
    }

    /// Commits the current index on top of HEAD.
    pub fn commit_staged(&self, message: &str) -> Result<Oid> {
        let signature = self
            .repo
            .signature()
            .context("Failed to determine commit author (set user.name and user.email)")?;

        let mut index = self.repo.index().context("Failed to read index")?;
        let tree_id = index.write_tree().context("Failed to write index tree")?;
        let tree = self
            .repo
            .find_tree(tree_id)
            .context("Failed to find index tree")?;

        let parent = self.head_commit()?;
        let parents: Vec<&Commit> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .context("Failed to create commit")?;

        debug!(commit = %oid, "Created commit");
        Ok(oid)
    }

    /// HEAD commit, or `None` before the first commit.
    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(
                head.peel_to_commit()
                    .context("Failed to resolve HEAD commit")?,
            )),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to get HEAD reference"),
        }
    }

    fn head_tree(&self) -> Result<Option<Tree<'_>>> {
        self.head_commit()?
            .map(|commit| commit.tree().context("Failed to get HEAD tree"))
            .transpose()
    }
}

fn delta_path(delta: &DiffDelta<'_>) -> Option<String> {
    delta
        .new_file()
        .path()
        .or_else(|| delta.old_file().path())
        .map(|path| path.to_string_lossy().into_owned())
}
