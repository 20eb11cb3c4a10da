//! engine::stash
//!
//! `stash save`, `stash list` and `stash pop`.
//!
//! # Stash payload
//!
//! `save` captures the working directory as is and every staged entry as
//! `untracked`, tagged with the area it came from. `pop` restores only the
//! working-directory entries; staged entries captured by `save` are lost.

use std::sync::Arc;

use super::errors::CommandError;
use super::interpret::{Ctx, HandlerResult};
use super::plan::Plan;
use super::transcript::Transcript;
use crate::core::state::{FileOrigin, StashEntry, StashedFile, WorkingFile, WorkingStatus};

const DEFAULT_MESSAGE: &str = "WIP";

/// `git stash save [message]`
pub(crate) fn save(ctx: &Ctx<'_>, message: Option<&str>) -> HandlerResult {
    if ctx.state.is_clean() {
        return Err(CommandError::precondition("No changes to stash").into());
    }

    let id = ctx.fresh_stash_id()?;
    let message = message.unwrap_or(DEFAULT_MESSAGE).to_string();
    let mut next = ctx.draft();

    let working = std::mem::take(&mut next.working_directory)
        .into_iter()
        .map(|f| StashedFile {
            path: f.path,
            status: f.status,
            origin: FileOrigin::Working,
        });
    let staged = std::mem::take(&mut next.staging_area)
        .into_iter()
        .map(|f| StashedFile {
            path: f.path,
            status: WorkingStatus::Untracked,
            origin: FileOrigin::Staged,
        });

    next.stash.insert(
        0,
        StashEntry {
            id,
            message: message.clone(),
            timestamp: ctx.env.now(),
            files: working.chain(staged).collect(),
        },
    );

    Ok(Plan::steps().wait(500).finish(
        Arc::new(next),
        Transcript::line(format!(
            "Saved working directory and index state: {message}"
        )),
    ))
}

/// `git stash list`
pub(crate) fn list(ctx: &Ctx<'_>) -> HandlerResult {
    let stash = &ctx.state.stash;
    let out = if stash.is_empty() {
        Transcript::line("No stash entries found")
    } else {
        Transcript::from_lines(
            stash
                .iter()
                .enumerate()
                .map(|(i, entry)| format!("stash@{{{i}}}: {}", entry.message)),
        )
    };
    Ok(Plan::steps().wait(300).finish(Arc::clone(ctx.state), out))
}

/// `git stash pop`
pub(crate) fn pop(ctx: &Ctx<'_>) -> HandlerResult {
    if ctx.state.stash.is_empty() {
        return Err(CommandError::precondition("No stash entries found").into());
    }

    let mut next = ctx.draft();
    let entry = next.stash.remove(0);

    for file in entry
        .files
        .into_iter()
        .filter(|f| f.origin == FileOrigin::Working)
    {
        next.staging_area.retain(|s| s.path != file.path);
        let restored = WorkingFile {
            path: file.path,
            status: file.status,
        };
        match next
            .working_directory
            .iter_mut()
            .find(|w| w.path == restored.path)
        {
            Some(existing) => *existing = restored,
            None => next.working_directory.push(restored),
        }
    }

    Ok(Plan::steps().wait(500).finish(
        Arc::new(next),
        Transcript::line(format!("Applied stash@{{0}}: {}", entry.message)),
    ))
}
