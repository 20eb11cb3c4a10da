//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Builds a session from the [`Context`]
//! 2. Feeds it command lines
//! 3. Formats and displays output
//!
//! Handlers do NOT mutate repository state directly.
//!
//! # Async Commands
//!
//! The session paces commands on the tokio timer, so the session-driven
//! handlers are async internally. Each one owns a runtime and blocks on
//! it, keeping dispatch synchronous.

mod completion;
mod graph;
mod repl;
mod run;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use graph::graph;
pub use repl::repl;
pub use run::run;

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Repl => repl::repl(ctx),
        Command::Run {
            lines,
            state,
            fresh,
            dump,
        } => run::run(ctx, &lines, state.as_deref(), fresh, dump),
        Command::Graph { lines, fresh } => graph::graph(ctx, &lines, fresh),
        Command::Completion { shell } => completion::completion(shell),
    }
}
