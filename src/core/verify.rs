//! core::verify
//!
//! Invariant checks over a repository snapshot.
//!
//! # Checked invariants
//!
//! - The current branch exists
//! - Every branch history is non-empty and references known commits
//! - HEAD names a known commit
//! - Branch names, remote names, commit ids are unique
//! - A path is in at most one of staging area / working directory,
//!   and appears at most once in each
//!
//! # Invariants
//!
//! - Never mutates the state
//! - Must be deterministic

use std::collections::HashSet;

use thiserror::Error;

use super::state::RepoState;

/// A violated invariant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("current branch does not exist: {0}")]
    CurrentBranchMissing(String),

    #[error("branch has an empty history: {0}")]
    EmptyBranch(String),

    #[error("branch {branch} references unknown commit {commit}")]
    UnknownCommit { branch: String, commit: String },

    #[error("HEAD names unknown commit: {0}")]
    DanglingHead(String),

    #[error("duplicate {kind}: {name}")]
    Duplicate { kind: &'static str, name: String },

    #[error("path is both staged and unstaged: {0}")]
    PathInBothAreas(String),
}

/// Result of verification.
#[derive(Debug)]
pub struct VerifyResult {
    /// Whether verification passed
    pub ok: bool,
    /// Errors found during verification
    pub errors: Vec<VerifyError>,
}

impl VerifyResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: vec![],
        }
    }

    /// Create a failed result with errors.
    pub fn failure(errors: Vec<VerifyError>) -> Self {
        Self { ok: false, errors }
    }
}

/// Check every snapshot invariant.
pub fn verify(state: &RepoState) -> VerifyResult {
    let mut errors = Vec::new();

    if !state.has_branch(&state.current_branch) {
        errors.push(VerifyError::CurrentBranchMissing(
            state.current_branch.to_string(),
        ));
    }

    if !state.contains_commit(&state.head) {
        errors.push(VerifyError::DanglingHead(state.head.to_string()));
    }

    for branch in &state.branches {
        if branch.commits.is_empty() {
            errors.push(VerifyError::EmptyBranch(branch.name.to_string()));
        }
        for id in &branch.commits {
            if !state.contains_commit(id) {
                errors.push(VerifyError::UnknownCommit {
                    branch: branch.name.to_string(),
                    commit: id.to_string(),
                });
            }
        }
    }

    duplicates(
        "branch name",
        state.branches.iter().map(|b| b.name.as_str()),
        &mut errors,
    );
    duplicates(
        "remote name",
        state.remotes.iter().map(|r| r.name.as_str()),
        &mut errors,
    );
    duplicates(
        "commit id",
        state.commits.iter().map(|c| c.id.as_str()),
        &mut errors,
    );
    duplicates(
        "staged path",
        state.staging_area.iter().map(|f| f.path.as_str()),
        &mut errors,
    );
    duplicates(
        "working path",
        state.working_directory.iter().map(|f| f.path.as_str()),
        &mut errors,
    );

    let staged: HashSet<&str> = state.staging_area.iter().map(|f| f.path.as_str()).collect();
    for file in &state.working_directory {
        if staged.contains(file.path.as_str()) {
            errors.push(VerifyError::PathInBothAreas(file.path.clone()));
        }
    }

    if errors.is_empty() {
        VerifyResult::success()
    } else {
        VerifyResult::failure(errors)
    }
}

fn duplicates<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
    errors: &mut Vec<VerifyError>,
) {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            errors.push(VerifyError::Duplicate {
                kind,
                name: name.to_string(),
            });
        }
    }
}
