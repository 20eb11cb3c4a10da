//! engine::remote
//!
//! `remote`, `push`, `fetch`, `pull` and `clone`.
//!
//! # Architecture
//!
//! Remotes are simulated inside the snapshot: a [`RemoteRepository`] holds
//! branch id lists and the commit records that were pushed to it. URLs are
//! opaque strings and never dereferenced.
//!
//! Push, fetch and pull publish an interim snapshot with the matching busy
//! flag set while their steps run; the final snapshot always clears it.
//!
//! # Tracking counters
//!
//! - `push` marks the pushed local branch as tracking `remote/branch`
//!   with `ahead = behind = 0`
//! - `fetch` sets `behind` on every branch tracking the fetched remote to
//!   how many more commits the remote branch has (never negative)
//! - `pull` replaces the current branch's history with the remote's and
//!   zeroes both counters

use std::sync::Arc;

use super::errors::CommandError;
use super::interpret::{Ctx, HandlerResult};
use super::plan::Plan;
use super::transcript::Transcript;
use crate::core::state::{
    Commit, RemoteBranch, RemoteRepository, RepoState, SyncStatus, Upstream,
};
use crate::core::types::{BranchName, CommitId};

/// Author recorded on commits that only exist remotely.
pub const REMOTE_AUTHOR: &str = "Remote User";
pub const REMOTE_EMAIL: &str = "remote@example.com";

/// `git remote add <name> <url>`
pub(crate) fn add(ctx: &Ctx<'_>, name: &str, url: &str) -> HandlerResult {
    if ctx.state.remote(name).is_some() {
        return Err(CommandError::precondition(format!("remote '{name}' already exists")).into());
    }

    let mut next = ctx.draft();
    next.remotes.push(RemoteRepository::empty(name, url));
    next.current_remote = Some(name.to_string());

    Ok(Plan::steps().wait(500).finish(
        Arc::new(next),
        Transcript::line(format!("Remote '{name}' added with url '{url}'")),
    ))
}

/// `git remote show <name>`
pub(crate) fn show(ctx: &Ctx<'_>, name: &str) -> HandlerResult {
    let remote = ctx
        .state
        .remote(name)
        .ok_or_else(|| CommandError::not_found(format!("remote '{name}' not found")))?;

    let mut out = Transcript::new();
    out.push(format!("* remote {name}"));
    out.push(format!("  URL: {}", remote.url));
    out.push("  Branches:");
    for branch in &remote.branches {
        out.push(format!("    {}", branch.name));
    }
    out.push("");

    Ok(Plan::unchanged(ctx.state, out))
}

/// `git push [remote [branch]]`
///
/// Copies the current branch's history to `remote/branch`, where `branch`
/// defaults to the current branch.
pub(crate) fn push(
    ctx: &Ctx<'_>,
    remote: Option<&str>,
    branch: Option<&BranchName>,
) -> HandlerResult {
    let index = resolve(ctx, remote)?;
    let current = ctx.current()?;
    let target = branch.unwrap_or(&ctx.state.current_branch).clone();
    let commits = current.commits.clone();

    let mut next = ctx.draft();
    let remote_name = next.remotes[index].name.clone();
    let records: Vec<Commit> = commits
        .iter()
        .filter_map(|id| ctx.state.commit(id))
        .cloned()
        .collect();

    let repo = &mut next.remotes[index];
    match repo.branches.iter_mut().find(|b| b.name == target) {
        Some(existing) => {
            existing.last_commit = commits.first().cloned();
            existing.commits = commits;
        }
        None => repo.branches.push(RemoteBranch::new(target.clone(), commits)),
    }
    for record in records {
        if repo.commit(&record.id).is_none() {
            repo.commits.push(record);
        }
    }

    for local in next.branches.iter_mut().filter(|b| b.name == target) {
        local.track(Upstream::new(remote_name.clone(), target.clone()));
    }
    next.remote_sync_status = Some(SyncStatus::UpToDate);
    next.is_pushing_to_remote = false;

    Ok(Plan::steps()
        .interim(with_flags(ctx.state, true, false))
        .wait(1000)
        .progress("Counting objects...")
        .wait(500)
        .progress("Compressing objects...")
        .wait(800)
        .progress("Writing objects...")
        .wait(600)
        .finish(
            Arc::new(next),
            Transcript::line(format!(
                "Branch '{target}' pushed to '{remote_name}/{target}'"
            )),
        ))
}

/// `git fetch [remote]`
pub(crate) fn fetch(ctx: &Ctx<'_>, remote: Option<&str>) -> HandlerResult {
    let index = resolve(ctx, remote)?;
    let repo = &ctx.state.remotes[index];

    let mut next = ctx.draft();
    for local in &mut next.branches {
        let Some(upstream) = local.upstream.as_ref() else {
            continue;
        };
        if upstream.remote != repo.name {
            continue;
        }
        if let Some(remote_branch) = repo.branch(&upstream.branch) {
            let missing = remote_branch
                .commits
                .len()
                .saturating_sub(local.commits.len());
            local.behind = Some(u32::try_from(missing).unwrap_or(u32::MAX));
        }
    }
    if let Some(status) = sync_status(&next, &repo.name) {
        next.remote_sync_status = Some(status);
    }
    next.is_fetching_from_remote = false;

    Ok(Plan::steps()
        .interim(with_flags(ctx.state, false, true))
        .wait(800)
        .progress(format!("Fetching {}...", repo.name))
        .wait(600)
        .finish(
            Arc::new(next),
            Transcript::line("Remote changes fetched successfully"),
        ))
}

/// `git pull [remote]`
///
/// If the remote has no branch named like the current one the pull is
/// reported as successful and nothing changes.
pub(crate) fn pull(ctx: &Ctx<'_>, remote: Option<&str>) -> HandlerResult {
    let index = resolve(ctx, remote)?;
    let repo = &ctx.state.remotes[index];
    ctx.current()?;

    let steps = Plan::steps()
        .interim(with_flags(ctx.state, false, true))
        .wait(800)
        .progress(format!("Fetching {}...", repo.name))
        .wait(600)
        .progress("Updating local branch...")
        .wait(500);
    let out = Transcript::line("Successfully pulled changes");

    let Some(remote_branch) = repo.branch(&ctx.state.current_branch) else {
        return Ok(steps.finish(Arc::clone(ctx.state), out));
    };

    let mut next = ctx.draft();
    let imported: Vec<Commit> = remote_branch
        .commits
        .iter()
        .filter(|id| !ctx.state.contains_commit(id))
        .map(|id| {
            repo.commit(id)
                .cloned()
                .unwrap_or_else(|| placeholder(ctx, id.clone()))
        })
        .collect();
    let mut commits = imported;
    commits.append(&mut next.commits);
    next.commits = commits;

    if let Some(local) = next.current_mut() {
        local.commits = remote_branch.commits.clone();
        local.ahead = Some(0);
        local.behind = Some(0);
    }
    if let Some(tip) = remote_branch.commits.first() {
        next.head = tip.clone();
    }
    next.remote_sync_status = Some(SyncStatus::UpToDate);
    next.is_fetching_from_remote = false;

    Ok(steps.finish(Arc::new(next), out))
}

/// `git clone <url>`: replace everything with a repository tracking
/// `origin/main`.
pub(crate) fn clone(ctx: &Ctx<'_>, url: &str) -> HandlerResult {
    let now = ctx.env.now();
    let mut next = RepoState::initial(ctx.template, now.clone());

    let root = Commit {
        id: CommitId::initial(),
        message: "Initial commit".to_string(),
        timestamp: now,
        parent: None,
        author: Some(REMOTE_AUTHOR.to_string()),
        email: Some(REMOTE_EMAIL.to_string()),
    };
    let origin = RemoteRepository {
        name: "origin".to_string(),
        url: url.to_string(),
        branches: vec![RemoteBranch::new(
            BranchName::main(),
            vec![CommitId::initial()],
        )],
        commits: vec![root],
    };
    next.remotes = vec![origin];
    next.current_remote = Some("origin".to_string());
    if let Some(main) = next.current_mut() {
        main.track(Upstream::new("origin", BranchName::main()));
    }

    Ok(Plan::steps()
        .wait(1000)
        .progress(format!("Cloning into {}...", repo_name(url)))
        .wait(800)
        .progress("Counting objects...")
        .wait(600)
        .progress("Receiving objects...")
        .wait(800)
        .finish(
            Arc::new(next),
            Transcript::line("Repository cloned successfully"),
        ))
}

/// Directory name `git clone` would use for `url`.
pub fn repo_name(url: &str) -> String {
    let last = url.rsplit('/').next().unwrap_or(url);
    let name = last.replacen(".git", "", 1);
    if name.is_empty() {
        "repo".to_string()
    } else {
        name
    }
}

/// Index of the remote a push/fetch/pull talks to.
fn resolve(ctx: &Ctx<'_>, remote: Option<&str>) -> Result<usize, CommandError> {
    if ctx.state.remotes.is_empty() {
        return Err(CommandError::precondition(
            "No remote repository configured",
        ));
    }
    let name = remote.unwrap_or(ctx.template.default_remote.as_str());
    ctx.state
        .remotes
        .iter()
        .position(|r| r.name == name)
        .ok_or_else(|| CommandError::not_found(format!("remote '{name}' not found")))
}

/// Sync status of the current branch against `remote`, if it tracks it.
fn sync_status(state: &RepoState, remote: &str) -> Option<SyncStatus> {
    let current = state.current()?;
    let upstream = current.upstream.as_ref()?;
    if upstream.remote != remote {
        return None;
    }
    Some(SyncStatus::from_counts(
        current.ahead.unwrap_or(0),
        current.behind.unwrap_or(0),
    ))
}

fn with_flags(state: &RepoState, pushing: bool, fetching: bool) -> RepoState {
    let mut interim = state.clone();
    interim.is_pushing_to_remote = pushing;
    interim.is_fetching_from_remote = fetching;
    interim
}

fn placeholder(ctx: &Ctx<'_>, id: CommitId) -> Commit {
    Commit {
        message: format!("Remote commit {id}"),
        id,
        timestamp: ctx.env.now(),
        parent: None,
        author: Some(REMOTE_AUTHOR.to_string()),
        email: Some(REMOTE_EMAIL.to_string()),
    }
}
