//! engine::branch
//!
//! `branch` and `checkout`.
//!
//! A new branch copies the current branch's history list; the two lists
//! are independent afterwards.

use std::sync::Arc;

use super::errors::{CommandError, HandlerError};
use super::interpret::{Ctx, HandlerResult};
use super::plan::Plan;
use super::transcript::Transcript;
use crate::core::state::{Branch, RepoState};
use crate::core::types::BranchName;

/// `git branch`: list branches, marking the current one.
pub(crate) fn list(ctx: &Ctx<'_>) -> HandlerResult {
    let state = ctx.state;
    let out = Transcript::from_lines(state.branches.iter().map(|b| {
        let marker = if b.name == state.current_branch { "* " } else { "  " };
        format!("{marker}{}", b.name)
    }));
    Ok(Plan::steps().wait(300).finish(Arc::clone(state), out))
}

/// `git branch <name>`
pub(crate) fn create(ctx: &Ctx<'_>, name: &BranchName) -> HandlerResult {
    let next = fork(ctx, name)?;
    Ok(Plan::steps().wait(500).finish(
        Arc::new(next),
        Transcript::line(format!("Created branch '{name}'")),
    ))
}

/// `git branch -d <name>` / `git branch -D <name>`
pub(crate) fn delete(ctx: &Ctx<'_>, name: &str) -> HandlerResult {
    if ctx.state.current_branch == *name {
        return Err(CommandError::precondition(format!(
            "Cannot delete the currently checked out branch '{name}'"
        ))
        .into());
    }
    if !ctx.state.branches.iter().any(|b| b.name == *name) {
        return Err(CommandError::not_found(format!("branch '{name}' not found")).into());
    }

    let mut next = ctx.draft();
    next.branches.retain(|b| b.name != *name);
    Ok(Plan::steps().wait(600).finish(
        Arc::new(next),
        Transcript::line(format!("Deleted branch {name}")),
    ))
}

/// `git checkout -b <name>`: create and switch.
pub(crate) fn checkout_new(ctx: &Ctx<'_>, name: &BranchName) -> HandlerResult {
    let mut next = fork(ctx, name)?;
    switch(&mut next, name.clone());

    Ok(Plan::steps()
        .wait(800)
        .progress(format!("Creating new branch '{name}'..."))
        .wait(400)
        .finish(
            Arc::new(next),
            Transcript::line(format!("Switched to a new branch '{name}'")),
        ))
}

/// `git checkout <name>`
pub(crate) fn checkout(ctx: &Ctx<'_>, name: &str) -> HandlerResult {
    let target = ctx
        .state
        .branches
        .iter()
        .find(|b| b.name == *name)
        .ok_or_else(|| CommandError::not_found(format!("branch '{name}' does not exist")))?;

    let mut next = ctx.draft();
    switch(&mut next, target.name.clone());
    Ok(Plan::steps().wait(600).finish(
        Arc::new(next),
        Transcript::line(format!("Switched to branch '{name}'")),
    ))
}

/// A draft with a new branch copied from the current one.
fn fork(ctx: &Ctx<'_>, name: &BranchName) -> Result<RepoState, HandlerError> {
    if ctx.state.has_branch(name) {
        return Err(CommandError::precondition(format!("branch '{name}' already exists")).into());
    }
    let commits = ctx.current()?.commits.clone();

    let mut next = ctx.draft();
    next.branches.push(Branch::new(name.clone(), commits));
    Ok(next)
}

/// Make `name` current and point HEAD at its tip.
fn switch(next: &mut RepoState, name: BranchName) {
    if let Some(tip) = next.branch(&name).and_then(Branch::tip).cloned() {
        next.head = tip;
    }
    next.current_branch = name;
}

#[cfg(test)]
mod tests {
    use super::super::interpret::test_support::Harness;
    use crate::core::types::{BranchName, CommitId};

    #[test]
    fn list_marks_current() {
        let mut h = Harness::new();
        h.run("git branch feature");
        let out = h.run("git branch");
        assert_eq!(out.lines(), ["* main", "  feature"]);
    }

    #[test]
    fn create_copies_history() {
        let mut h = Harness::new();
        h.run("git add .");
        h.run("git commit -m work");
        let out = h.run("git branch feature");

        assert_eq!(out.lines(), ["Created branch 'feature'"]);
        let feature = h.state.branch(&BranchName::new("feature").unwrap()).unwrap();
        assert_eq!(feature.commits, h.state.current().unwrap().commits);
        assert_eq!(h.state.current_branch.as_str(), "main");
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut h = Harness::new();
        h.run("git branch feature");
        let count = h.state.branches.len();

        assert_eq!(
            h.reject("git branch feature"),
            "Error: branch 'feature' already exists"
        );
        assert_eq!(
            h.reject("git checkout -b feature"),
            "Error: branch 'feature' already exists"
        );
        assert_eq!(h.state.branches.len(), count);
    }

    #[test]
    fn delete_rules() {
        let mut h = Harness::new();
        h.run("git branch feature");

        assert_eq!(
            h.reject("git branch -d main"),
            "Error: Cannot delete the currently checked out branch 'main'"
        );
        assert_eq!(
            h.reject("git branch -D ghost"),
            "Error: branch 'ghost' not found"
        );

        let out = h.run("git branch -D feature");
        assert_eq!(out.lines(), ["Deleted branch feature"]);
        assert_eq!(h.state.branches.len(), 1);
    }

    #[test]
    fn checkout_new_switches() {
        let mut h = Harness::new();
        let plan = h.plan("git checkout -b feature");
        assert_eq!(
            plan.progress_lines().collect::<Vec<_>>(),
            ["Creating new branch 'feature'..."]
        );
        h.state = plan.outcome.state;

        assert_eq!(h.state.current_branch.as_str(), "feature");
        assert_eq!(h.state.branches.len(), 2);
    }

    #[test]
    fn checkout_round_trip() {
        let mut h = Harness::new();
        h.run("git checkout -b feature");
        h.run("git checkout main");
        let out = h.run("git checkout feature");

        assert_eq!(out.lines(), ["Switched to branch 'feature'"]);
        assert_eq!(h.state.current_branch.as_str(), "feature");
        assert_eq!(h.state.branches.len(), 2);
    }

    #[test]
    fn checkout_moves_head_to_tip() {
        let mut h = Harness::new();
        h.run("git checkout -b feature");
        h.run("git add .");
        h.run("git commit -m on-feature");
        h.run("git checkout main");

        assert_eq!(h.state.head, CommitId::initial());
    }

    #[test]
    fn checkout_unknown_rejected() {
        let mut h = Harness::new();
        assert_eq!(
            h.reject("git checkout nowhere"),
            "Error: branch 'nowhere' does not exist"
        );
    }
}
