//! cli
//!
//! Command-line interface layer for the playground.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and resolve it against the flags
//! - Delegate to command handlers
//! - Does NOT mutate repository state directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, builds a
//! [`Context`], and dispatches to a handler. Every state change flows
//! through a [`Session`].

pub mod args;
pub mod commands;

pub use args::{Cli, Command, Shell};

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::session::pacer::{InstantPacer, TokioPacer};
use crate::session::{Session, SessionBuilder};
use crate::ui::output::{self, Verbosity};

/// Resolved settings shared by every handler.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub verbosity: Verbosity,
    /// Print transcripts in wire form.
    pub wire: bool,
    /// Skip simulated latency.
    pub instant: bool,
}

impl Context {
    /// A session builder configured from flags and config.
    pub fn session(&self) -> SessionBuilder {
        let builder = Session::builder()
            .template(self.config.template())
            .verbosity(self.verbosity);
        if self.instant {
            builder.pacer(InstantPacer)
        } else {
            builder.pacer(TokioPacer::new(self.config.speed()))
        }
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    let loaded = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }
    match loaded.config.loaded_from() {
        Some(path) => output::debug(format!("config: {}", path.display()), verbosity),
        None => output::debug("config: defaults", verbosity),
    }

    // Flags win over the config file.
    let ctx = Context {
        wire: cli.wire || loaded.config.wire(),
        instant: cli.instant,
        verbosity,
        config: loaded.config,
    };

    commands::dispatch(cli.command.unwrap_or(Command::Repl), &ctx)
}
