//! engine::history
//!
//! `log`, `commit`, `reset --hard` and `revert`.
//!
//! # Commit parentage
//!
//! A commit made with `git commit` always takes the repository's root
//! commit (the oldest entry of the log) as its parent, whatever HEAD is.
//! A revert commit takes the current HEAD. History therefore does not form
//! a chain across several commits; branch histories are the id lists kept
//! on each branch, not parent links.

use std::sync::Arc;

use super::errors::{CommandError, InternalError};
use super::interpret::{missing_current, Ctx, HandlerResult};
use super::plan::Plan;
use super::transcript::Transcript;
use crate::core::state::{Commit, RepoState};
use crate::core::types::CommitId;

const SHORT_ID: usize = 7;

/// `git log`: every commit in the log, newest first.
pub(crate) fn log(ctx: &Ctx<'_>) -> HandlerResult {
    let state = ctx.state;
    let mut out = Transcript::new();
    for commit in &state.commits {
        let marker = if commit.id == state.head { " (HEAD)" } else { "" };
        out.push(format!("commit {}{marker}", commit.id));
        out.push(format!("Date: {}", commit.timestamp.log_format()));
        out.push("");
        out.push(format!("    {}", commit.message));
        out.push("");
    }

    Ok(Plan::steps().wait(300).finish(Arc::clone(state), out))
}

/// `git commit -m <message>`
pub(crate) fn commit(ctx: &Ctx<'_>, message: &str) -> HandlerResult {
    if ctx.state.staging_area.is_empty() {
        return Err(CommandError::precondition("Nothing to commit, working tree clean").into());
    }
    ctx.current()?;

    let id = ctx.fresh_commit_id()?;
    let parent = ctx.state.root_commit().map(|c| c.id.clone());
    let mut next = ctx.draft();
    record(&mut next, ctx, id.clone(), message.to_string(), parent)?;
    next.staging_area.clear();

    let out = format!("[{} {}] {}", next.current_branch, id, message);
    Ok(Plan::steps()
        .wait(1000)
        .progress("Creating commit...")
        .wait(500)
        .finish(Arc::new(next), Transcript::line(out)))
}

/// `git reset --hard <commit>`: move HEAD, discard all changes.
///
/// Branch histories are left as they are.
pub(crate) fn reset_hard(ctx: &Ctx<'_>, commit: &str) -> HandlerResult {
    let target = ctx.find_commit(commit)?;
    let out = format!(
        "HEAD is now at {} {}",
        target.id.short(SHORT_ID),
        target.message
    );

    let mut next = ctx.draft();
    next.head = target.id.clone();
    next.staging_area.clear();
    next.working_directory.clear();

    Ok(Plan::steps()
        .wait(800)
        .finish(Arc::new(next), Transcript::line(out)))
}

/// `git revert <commit>`: a new commit undoing `commit`, parented on HEAD.
pub(crate) fn revert(ctx: &Ctx<'_>, commit: &str) -> HandlerResult {
    let target = ctx.find_commit(commit)?;
    ctx.current()?;

    let id = ctx.fresh_commit_id()?;
    let message = format!("Revert \"{}\"", target.message);
    let mut next = ctx.draft();
    let parent = Some(next.head.clone());
    record(&mut next, ctx, id.clone(), message, parent)?;

    Ok(Plan::steps().wait(800).finish(
        Arc::new(next),
        Transcript::line(format!("Created revert commit {}", id.short(SHORT_ID))),
    ))
}

/// Prepend a new commit to the log and the current branch, move HEAD.
fn record(
    next: &mut RepoState,
    ctx: &Ctx<'_>,
    id: CommitId,
    message: String,
    parent: Option<CommitId>,
) -> Result<(), InternalError> {
    next.commits.insert(
        0,
        Commit {
            id: id.clone(),
            message,
            timestamp: ctx.env.now(),
            parent,
            author: Some(ctx.template.author.clone()),
            email: Some(ctx.template.email.clone()),
        },
    );

    let missing = missing_current(next);
    let branch = next.current_mut().ok_or(missing)?;
    branch.commits.insert(0, id.clone());
    if branch.upstream.is_some() {
        branch.ahead = Some(branch.ahead.unwrap_or(0).saturating_add(1));
    }
    next.head = id;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::interpret::test_support::Harness;
    use crate::core::state::Upstream;
    use crate::core::types::{BranchName, CommitId};
    use std::sync::Arc;

    mod log {
        use super::*;

        #[test]
        fn renders_five_lines_per_commit() {
            let mut h = Harness::bare();
            let out = h.run("git log");

            assert_eq!(out.lines().len(), 5);
            assert_eq!(out.lines()[0], "commit initial (HEAD)");
            assert!(out.lines()[1].starts_with("Date: 1/1/2024, "));
            assert_eq!(out.lines()[2], "");
            assert_eq!(out.lines()[3], "    Initial commit");
            assert_eq!(out.lines()[4], "");
        }

        #[test]
        fn repeated_log_is_identical() {
            let mut h = Harness::new();
            h.run("git add .");
            h.run("git commit -m one");
            let first = h.run("git log");
            let second = h.run("git log");
            assert_eq!(first.to_wire(), second.to_wire());
        }
    }

    mod commit {
        use super::*;

        #[test]
        fn requires_staged_changes() {
            let mut h = Harness::new();
            assert_eq!(
                h.reject("git commit -m \"x\""),
                "Error: Nothing to commit, working tree clean"
            );
        }

        #[test]
        fn missing_message_is_usage_error() {
            let mut h = Harness::new();
            h.run("git add .");
            let out = h.reject("git commit");
            assert!(out.starts_with("Error: please provide a commit message"));
        }

        #[test]
        fn creates_commit_on_current_branch() {
            let mut h = Harness::new();
            h.run("git add .");
            let out = h.run("git commit -m \"Add feature\"");

            assert_eq!(out.lines(), ["[main c000001] Add feature"]);
            assert_eq!(h.state.commits.len(), 2);
            assert_eq!(h.state.commits[0].message, "Add feature");
            assert_eq!(h.state.head, CommitId::new("c000001").unwrap());
            assert_eq!(
                h.state.current().unwrap().commits,
                [CommitId::new("c000001").unwrap(), CommitId::initial()]
            );
            assert!(h.state.staging_area.is_empty());
            assert_eq!(h.state.commits[0].author.as_deref(), Some("User"));
        }

        #[test]
        fn parent_is_always_the_root() {
            let mut h = Harness::new();
            h.run("git add app.js");
            h.run("git commit -m first");
            h.run("git add index.html");
            h.run("git commit -m second");

            assert_eq!(h.state.commits.len(), 3);
            for commit in &h.state.commits[..2] {
                assert_eq!(commit.parent, Some(CommitId::initial()));
            }
        }

        #[test]
        fn increments_ahead_when_tracking() {
            let mut h = Harness::new();
            let mut state = (*h.state).clone();
            state.branches[0].track(Upstream::new("origin", BranchName::main()));
            h.state = Arc::new(state);

            h.run("git add .");
            h.run("git commit -m x");
            assert_eq!(h.state.current().unwrap().ahead, Some(1));
        }

        #[test]
        fn untracked_branch_has_no_ahead_counter() {
            let mut h = Harness::new();
            h.run("git add .");
            h.run("git commit -m x");
            assert_eq!(h.state.current().unwrap().ahead, None);
        }
    }

    mod reset {
        use super::*;

        #[test]
        fn moves_head_and_clears_changes() {
            let mut h = Harness::new();
            h.run("git add app.js");
            h.run("git commit -m work");
            let branch_before = h.state.current().unwrap().commits.clone();

            let out = h.run("git reset --hard initial");
            assert_eq!(out.lines(), ["HEAD is now at initial Initial commit"]);
            assert_eq!(h.state.head, CommitId::initial());
            assert!(h.state.is_clean());
            assert_eq!(h.state.current().unwrap().commits, branch_before);
        }

        #[test]
        fn unknown_commit_rejected() {
            let mut h = Harness::new();
            assert_eq!(
                h.reject("git reset --hard deadbee"),
                "Error: commit deadbee does not exist"
            );
        }
    }

    mod revert {
        use super::*;

        #[test]
        fn parents_on_head() {
            let mut h = Harness::new();
            h.run("git add .");
            h.run("git commit -m work");
            let head = h.state.head.clone();

            let out = h.run("git revert c000001");
            assert_eq!(out.lines(), ["Created revert commit c000002"]);

            let revert = &h.state.commits[0];
            assert_eq!(revert.message, "Revert \"work\"");
            assert_eq!(revert.parent, Some(head));
            assert_eq!(h.state.head, revert.id);
            assert_eq!(h.state.current().unwrap().commits.len(), 3);
        }

        #[test]
        fn unknown_commit_rejected() {
            let mut h = Harness::new();
            assert_eq!(
                h.reject("git revert nothing"),
                "Error: commit nothing does not exist"
            );
        }
    }
}
