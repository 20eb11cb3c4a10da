//! engine::worktree
//!
//! `init`, `status` and `add`: commands over the working directory and
//! the staging area.

use std::sync::Arc;

use super::errors::CommandError;
use super::interpret::{Ctx, HandlerResult};
use super::plan::Plan;
use super::transcript::Transcript;
use crate::core::state::{RepoState, StagedFile};

/// `git init`: a fresh repository with the sample files untracked.
pub(crate) fn init(ctx: &Ctx<'_>) -> HandlerResult {
    let next = RepoState::with_sample_files(ctx.template, ctx.env.now());
    Ok(Plan::steps().wait(1000).finish(
        Arc::new(next),
        Transcript::line("Initialized empty Git repository"),
    ))
}

/// `git status`
pub(crate) fn status(ctx: &Ctx<'_>) -> HandlerResult {
    let state = ctx.state;
    let mut out = Transcript::new();
    out.push(format!("On branch {}", state.current_branch));
    out.push(format!("HEAD -> {}", state.head));

    if !state.staging_area.is_empty() {
        out.push("Changes to be committed:");
        for file in &state.staging_area {
            out.push(format!("  {}: {}", file.status, file.path));
        }
    }
    if !state.working_directory.is_empty() {
        out.push("Changes not staged for commit:");
        for file in &state.working_directory {
            out.push(format!("  {}: {}", file.status, file.path));
        }
    }

    Ok(Plan::steps().wait(500).finish(Arc::clone(state), out))
}

/// `git add .`
pub(crate) fn add_all(ctx: &Ctx<'_>) -> HandlerResult {
    let mut next = ctx.draft();
    let working = std::mem::take(&mut next.working_directory);
    next.staging_area
        .extend(working.into_iter().map(|file| StagedFile {
            status: file.status.staged(),
            path: file.path,
        }));

    Ok(Plan::steps()
        .wait(800)
        .progress("Adding all changes to staging area...")
        .wait(400)
        .finish(Arc::new(next), Transcript::line("Changes staged successfully")))
}

/// `git add <path>`
pub(crate) fn add(ctx: &Ctx<'_>, path: &str) -> HandlerResult {
    let index = ctx
        .state
        .working_directory
        .iter()
        .position(|f| f.path == path)
        .ok_or_else(|| {
            CommandError::not_found(format!("pathspec '{path}' did not match any files"))
        })?;

    let mut next = ctx.draft();
    let file = next.working_directory.remove(index);
    next.staging_area.push(StagedFile {
        status: file.status.staged(),
        path: file.path,
    });

    Ok(Plan::steps().wait(600).finish(
        Arc::new(next),
        Transcript::line(format!("Added '{path}' to staging area")),
    ))
}

#[cfg(test)]
mod tests {
    use super::super::interpret::test_support::Harness;
    use crate::core::state::{StagedStatus, WorkingFile, WorkingStatus};
    use std::sync::Arc;

    #[test]
    fn init_resets_to_sample_files() {
        let mut h = Harness::bare();
        let out = h.run("git init");

        assert_eq!(out.lines(), ["Initialized empty Git repository"]);
        assert_eq!(h.state.working_directory.len(), 3);
        assert_eq!(h.state.commits.len(), 1);
    }

    #[test]
    fn status_on_clean_repo_has_two_lines() {
        let mut h = Harness::bare();
        let out = h.run("git status");
        assert_eq!(out.lines(), ["On branch main", "HEAD -> initial"]);
    }

    #[test]
    fn status_lists_both_sections() {
        let mut h = Harness::new();
        h.run("git add app.js");
        let out = h.run("git status");

        assert_eq!(
            out.lines(),
            [
                "On branch main",
                "HEAD -> initial",
                "Changes to be committed:",
                "  added: app.js",
                "Changes not staged for commit:",
                "  untracked: index.html",
                "  untracked: styles.css",
            ]
        );
    }

    #[test]
    fn status_is_read_only() {
        let h = Harness::new();
        let plan = h.plan("git status");
        assert!(Arc::ptr_eq(&h.state, &plan.outcome.state));
        assert_eq!(plan.total_delay().as_millis(), 500);
    }

    #[test]
    fn add_all_maps_statuses() {
        let mut h = Harness::new();
        let mut state = (*h.state).clone();
        state.working_directory.push(WorkingFile {
            path: "README.md".into(),
            status: WorkingStatus::Modified,
        });
        h.state = Arc::new(state);

        let plan = h.plan("git add .");
        assert_eq!(
            plan.progress_lines().collect::<Vec<_>>(),
            ["Adding all changes to staging area..."]
        );
        h.state = plan.outcome.state;

        assert!(h.state.working_directory.is_empty());
        let statuses: Vec<_> = h.state.staging_area.iter().map(|f| f.status).collect();
        assert_eq!(
            statuses,
            [
                StagedStatus::Added,
                StagedStatus::Added,
                StagedStatus::Added,
                StagedStatus::Modified
            ]
        );
    }

    #[test]
    fn add_single_path() {
        let mut h = Harness::new();
        let out = h.run("git add styles.css");

        assert_eq!(out.lines(), ["Added 'styles.css' to staging area"]);
        assert!(h.state.working_file("styles.css").is_none());
        assert_eq!(h.state.staging_area.len(), 1);
        assert_eq!(h.state.working_directory.len(), 2);
    }

    #[test]
    fn add_missing_path_rejected() {
        let mut h = Harness::new();
        assert_eq!(
            h.reject("git add nope.txt"),
            "Error: pathspec 'nope.txt' did not match any files"
        );
    }
}
