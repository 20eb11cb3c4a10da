//! core::state
//!
//! The repository aggregate and the records it is made of.
//!
//! # Snapshot semantics
//!
//! A [`RepoState`] is a plain value describing the whole simulated
//! repository at one instant. The session hands snapshots out behind an
//! `Arc`, so collaborators can read but never mutate them; the interpreter
//! clones a snapshot, edits its private copy and returns the copy as the
//! next snapshot.
//!
//! Field names serialize in camelCase (`currentBranch`, `stagingArea`,
//! `HEAD`, ...) so JSON dumps line up with the playground's data model.

use serde::{Deserialize, Serialize};

use super::types::{BranchName, CommitId, Fingerprint, UtcTimestamp};

/// Files every reset or `git init` drops into the working directory.
pub const DEFAULT_SAMPLE_FILES: [&str; 3] = ["index.html", "styles.css", "app.js"];

/// A single commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: CommitId,
    pub message: String,
    pub timestamp: UtcTimestamp,
    /// The one prior commit, or `None` for a root.
    pub parent: Option<CommitId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A remote-tracking reference, displayed as `remote/branch`.
///
/// Stored as a pair: remote names may themselves contain `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upstream {
    pub remote: String,
    pub branch: BranchName,
}

impl Upstream {
    pub fn new(remote: impl Into<String>, branch: BranchName) -> Self {
        Self {
            remote: remote.into(),
            branch,
        }
    }
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.remote, self.branch)
    }
}

/// A local branch.
///
/// `commits` is the branch history from tip to root (newest first). It is a
/// list of references into [`RepoState::commits`], not an owning container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: BranchName,
    pub commits: Vec<CommitId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<Upstream>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ahead: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behind: Option<u32>,
}

impl Branch {
    /// A branch with a history and no tracking information.
    pub fn new(name: BranchName, commits: Vec<CommitId>) -> Self {
        Self {
            name,
            commits,
            upstream: None,
            ahead: None,
            behind: None,
        }
    }

    /// The newest commit on this branch.
    pub fn tip(&self) -> Option<&CommitId> {
        self.commits.first()
    }

    /// Mark the branch as in sync with `upstream`.
    pub fn track(&mut self, upstream: Upstream) {
        self.upstream = Some(upstream);
        self.ahead = Some(0);
        self.behind = Some(0);
    }
}

/// Status of an entry in the staging area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagedStatus {
    Added,
    Modified,
    Deleted,
}

impl std::fmt::Display for StagedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StagedStatus::Added => "added",
            StagedStatus::Modified => "modified",
            StagedStatus::Deleted => "deleted",
        })
    }
}

/// Status of an entry in the working directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkingStatus {
    Modified,
    Untracked,
    Deleted,
}

impl WorkingStatus {
    /// The staging status a file takes when it is added.
    ///
    /// Untracked files become `added`; everything else (including
    /// deletions) becomes `modified`.
    pub fn staged(self) -> StagedStatus {
        match self {
            WorkingStatus::Untracked => StagedStatus::Added,
            WorkingStatus::Modified | WorkingStatus::Deleted => StagedStatus::Modified,
        }
    }
}

impl std::fmt::Display for WorkingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            WorkingStatus::Modified => "modified",
            WorkingStatus::Untracked => "untracked",
            WorkingStatus::Deleted => "deleted",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedFile {
    pub path: String,
    pub status: StagedStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingFile {
    pub path: String,
    pub status: WorkingStatus,
}

impl WorkingFile {
    pub fn untracked(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: WorkingStatus::Untracked,
        }
    }
}

/// Which area a stashed file was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOrigin {
    Working,
    Staged,
}

/// A file captured by `git stash save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashedFile {
    pub path: String,
    pub status: WorkingStatus,
    pub origin: FileOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashEntry {
    pub id: String,
    pub message: String,
    pub timestamp: UtcTimestamp,
    pub files: Vec<StashedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteBranch {
    pub name: BranchName,
    pub commits: Vec<CommitId>,
    pub last_commit: Option<CommitId>,
}

impl RemoteBranch {
    pub fn new(name: BranchName, commits: Vec<CommitId>) -> Self {
        let last_commit = commits.first().cloned();
        Self {
            name,
            commits,
            last_commit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepository {
    pub name: String,
    pub url: String,
    pub branches: Vec<RemoteBranch>,
    pub commits: Vec<Commit>,
}

impl RemoteRepository {
    /// A freshly added remote: nothing pushed yet.
    pub fn empty(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            branches: Vec::new(),
            commits: Vec::new(),
        }
    }

    pub fn branch(&self, name: &BranchName) -> Option<&RemoteBranch> {
        self.branches.iter().find(|b| &b.name == name)
    }

    pub fn commit(&self, id: &CommitId) -> Option<&Commit> {
        self.commits.iter().find(|c| &c.id == id)
    }
}

/// How the current branch relates to its upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncStatus {
    Ahead,
    Behind,
    Diverged,
    UpToDate,
}

impl SyncStatus {
    /// Classify a pair of ahead/behind counters.
    pub fn from_counts(ahead: u32, behind: u32) -> Self {
        match (ahead > 0, behind > 0) {
            (true, true) => SyncStatus::Diverged,
            (false, true) => SyncStatus::Behind,
            (true, false) => SyncStatus::Ahead,
            (false, false) => SyncStatus::UpToDate,
        }
    }
}

/// Parameters for building fresh repositories.
///
/// Resolved from configuration; the defaults reproduce the playground's
/// stock setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Author recorded on locally created commits.
    pub author: String,
    pub email: String,
    /// Paths placed in the working directory by `init` and `reset`.
    pub sample_files: Vec<String>,
    /// Remote used by push/fetch/pull when none is named.
    pub default_remote: String,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            author: "User".to_string(),
            email: "user@example.com".to_string(),
            sample_files: DEFAULT_SAMPLE_FILES.iter().map(|s| s.to_string()).collect(),
            default_remote: "origin".to_string(),
        }
    }
}

/// The whole simulated repository at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoState {
    pub current_branch: BranchName,
    pub branches: Vec<Branch>,
    /// Global commit log, newest first.
    pub commits: Vec<Commit>,
    pub staging_area: Vec<StagedFile>,
    pub working_directory: Vec<WorkingFile>,
    #[serde(rename = "HEAD")]
    pub head: CommitId,
    /// Newest first.
    pub stash: Vec<StashEntry>,
    pub remotes: Vec<RemoteRepository>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_remote: Option<String>,
    pub is_pushing_to_remote: bool,
    pub is_fetching_from_remote: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_sync_status: Option<SyncStatus>,
}

impl RepoState {
    /// A fresh repository: one root commit named `initial` on `main`.
    pub fn initial(template: &Template, now: UtcTimestamp) -> Self {
        let root = Commit {
            id: CommitId::initial(),
            message: "Initial commit".to_string(),
            timestamp: now,
            parent: None,
            author: Some(template.author.clone()),
            email: Some(template.email.clone()),
        };

        Self {
            current_branch: BranchName::main(),
            branches: vec![Branch::new(BranchName::main(), vec![root.id.clone()])],
            head: root.id.clone(),
            commits: vec![root],
            staging_area: Vec::new(),
            working_directory: Vec::new(),
            stash: Vec::new(),
            remotes: Vec::new(),
            current_remote: None,
            is_pushing_to_remote: false,
            is_fetching_from_remote: false,
            remote_sync_status: None,
        }
    }

    /// A fresh repository with the template's sample files untracked.
    pub fn with_sample_files(template: &Template, now: UtcTimestamp) -> Self {
        let mut state = Self::initial(template, now);
        state.working_directory = template
            .sample_files
            .iter()
            .map(WorkingFile::untracked)
            .collect();
        state
    }

    pub fn branch(&self, name: &BranchName) -> Option<&Branch> {
        self.branches.iter().find(|b| &b.name == name)
    }

    pub fn has_branch(&self, name: &BranchName) -> bool {
        self.branch(name).is_some()
    }

    /// The checked-out branch record.
    pub fn current(&self) -> Option<&Branch> {
        self.branch(&self.current_branch)
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut Branch> {
        let name = self.current_branch.clone();
        self.branches.iter_mut().find(|b| b.name == name)
    }

    pub fn commit(&self, id: &CommitId) -> Option<&Commit> {
        self.commits.iter().find(|c| &c.id == id)
    }

    pub fn contains_commit(&self, id: &CommitId) -> bool {
        self.commit(id).is_some()
    }

    /// The oldest commit in the log.
    pub fn root_commit(&self) -> Option<&Commit> {
        self.commits.last()
    }

    pub fn remote(&self, name: &str) -> Option<&RemoteRepository> {
        self.remotes.iter().find(|r| r.name == name)
    }

    pub fn working_file(&self, path: &str) -> Option<&WorkingFile> {
        self.working_directory.iter().find(|f| f.path == path)
    }

    /// True when neither the working directory nor the staging area has entries.
    pub fn is_clean(&self) -> bool {
        self.working_directory.is_empty() && self.staging_area.is_empty()
    }

    /// Hash the observable parts of the state.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut entries = vec![
            format!("current={}", self.current_branch),
            format!("HEAD={}", self.head),
            format!("commits={}", self.commits.len()),
            format!("sync={:?}", self.remote_sync_status),
            format!("current_remote={:?}", self.current_remote),
        ];
        for branch in &self.branches {
            let ids: Vec<&str> = branch.commits.iter().map(CommitId::as_str).collect();
            entries.push(format!(
                "branch:{}={} upstream={:?} ahead={:?} behind={:?}",
                branch.name,
                ids.join(","),
                branch.upstream.as_ref().map(ToString::to_string),
                branch.ahead,
                branch.behind
            ));
        }
        for file in &self.staging_area {
            entries.push(format!("staged:{}={}", file.path, file.status));
        }
        for file in &self.working_directory {
            entries.push(format!("working:{}={}", file.path, file.status));
        }
        for (index, entry) in self.stash.iter().enumerate() {
            entries.push(format!("stash:{index}={}", entry.id));
        }
        for remote in &self.remotes {
            for branch in &remote.branches {
                let ids: Vec<&str> = branch.commits.iter().map(CommitId::as_str).collect();
                entries.push(format!(
                    "remote:{}:{}={}",
                    remote.name,
                    branch.name,
                    ids.join(",")
                ));
            }
            entries.push(format!("remote:{}@{}", remote.name, remote.url));
        }
        Fingerprint::compute(entries)
    }
}
