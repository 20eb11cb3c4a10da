//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file instead of searching
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--instant`: Skip simulated latency
//! - `--wire`: Print transcripts in the one-line wire form

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gitplay - a sandboxed, in-memory Git playground
#[derive(Parser, Debug)]
#[command(name = "gitplay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the standard locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Skip simulated latency (overrides pacing.speed)
    #[arg(long, global = true)]
    pub instant: bool,

    /// Print transcripts with literal `\n` separators
    #[arg(long, global = true)]
    pub wire: bool,

    /// Defaults to `repl` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an interactive playground session
    #[command(
        name = "repl",
        long_about = "Start an interactive playground session.\n\n\
            The playground starts from a fresh repository with a few sample files in \
            the working directory. Type git commands at the prompt; nothing touches \
            your disk or the network. Lines starting with ':' are playground commands.",
        after_help = "\
PLAYGROUND COMMANDS:
    :help            list playground commands
    :reset           start over with the sample files
    :touch <path>    pretend a file was edited outside git
    :graph           print the commit graph as JSON
    :state           print the raw repository state as JSON
    :quit            leave (also: exit)

WORKFLOW EXAMPLES:
    $ git status
    $ git add .
    $ git commit -m \"first commit\"
    $ git checkout -b feature
    $ git remote add origin https://example.com/me/demo.git
    $ git push"
    )]
    Repl,

    /// Run git command lines in order and print each transcript
    #[command(
        name = "run",
        after_help = "\
EXAMPLES:
    # The classic first commit
    gitplay run --fresh 'git add .' 'git commit -m \"Add feature\"' 'git log'

    # Continue from a saved state and dump the result
    gitplay run --state before.json --dump 'git checkout -b topic'"
    )]
    Run {
        /// Command lines, each quoted as one argument
        #[arg(required = true, value_name = "LINE")]
        lines: Vec<String>,

        /// Start from a JSON state dump instead of a fresh repository
        #[arg(long, value_name = "PATH", conflicts_with = "fresh")]
        state: Option<PathBuf>,

        /// Reset first so the sample files are present
        #[arg(long)]
        fresh: bool,

        /// Print the final state as JSON
        #[arg(long)]
        dump: bool,
    },

    /// Run command lines and print the commit graph as JSON
    #[command(name = "graph")]
    Graph {
        /// Command lines, each quoted as one argument
        #[arg(value_name = "LINE")]
        lines: Vec<String>,

        /// Reset first so the sample files are present
        #[arg(long)]
        fresh: bool,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_repl() {
        let cli = Cli::try_parse_from(["gitplay", "--instant"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.instant);
    }

    #[test]
    fn run_takes_lines_and_global_flags() {
        let cli =
            Cli::try_parse_from(["gitplay", "run", "git status", "git log", "--wire", "-q"])
                .unwrap();
        assert!(cli.wire && cli.quiet);
        match cli.command {
            Some(Command::Run { lines, fresh, .. }) => {
                assert_eq!(lines, ["git status", "git log"]);
                assert!(!fresh);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn run_requires_a_line() {
        assert!(Cli::try_parse_from(["gitplay", "run"]).is_err());
    }

    #[test]
    fn state_conflicts_with_fresh() {
        assert!(
            Cli::try_parse_from(["gitplay", "run", "--fresh", "--state", "s.json", "git log"])
                .is_err()
        );
    }
}
