//! engine::command
//!
//! The closed set of supported commands and the text parser that
//! produces them.
//!
//! # Parsing
//!
//! A line is split on whitespace. The first token must be `git`, the
//! second selects the subcommand, and the rest are arguments. There is no
//! shell-style quoting: a commit message is rebuilt by joining the tokens
//! after `-m` with single spaces and stripping every `'` and `"`.
//!
//! Argument shapes a subcommand does not recognize parse to
//! [`Command::Ignored`], which the interpreter runs as a silent no-op.
//!
//! # Example
//!
//! ```
//! use git_playground::engine::command::{parse, Command};
//!
//! let cmd = parse("git commit -m \"Add feature\"").unwrap();
//! assert_eq!(cmd, Command::Commit { message: "Add feature".into() });
//!
//! assert!(parse("ls -la").is_err());
//! ```

use super::errors::CommandError;
use crate::core::types::BranchName;

/// A parsed command with its validated arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init,
    Status,
    Log,
    /// `add .`
    AddAll,
    Add {
        path: String,
    },
    Commit {
        message: String,
    },
    /// `branch` with no arguments.
    ListBranches,
    CreateBranch {
        name: BranchName,
    },
    /// `branch -d <name>` or `branch -D <name>`.
    DeleteBranch {
        name: String,
    },
    /// `checkout -b <name>`.
    CheckoutNew {
        name: BranchName,
    },
    Checkout {
        name: String,
    },
    /// `reset --hard <commit>`.
    ResetHard {
        commit: String,
    },
    Revert {
        commit: String,
    },
    StashSave {
        message: Option<String>,
    },
    StashList,
    StashPop,
    RemoteAdd {
        name: String,
        url: String,
    },
    RemoteShow {
        name: String,
    },
    Push {
        remote: Option<String>,
        branch: Option<BranchName>,
    },
    Fetch {
        remote: Option<String>,
    },
    Pull {
        remote: Option<String>,
    },
    Clone {
        url: String,
    },
    /// A recognized subcommand with an argument shape that does nothing.
    Ignored {
        subcommand: String,
    },
}

/// Parse one command line.
///
/// # Errors
///
/// - [`CommandError::NotGit`] if the first token is not `git`
/// - [`CommandError::UnknownCommand`] for an unsupported subcommand
/// - [`CommandError::Usage`] for missing required arguments or an invalid
///   branch name
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    match tokens.first() {
        Some(&"git") => {}
        _ => return Err(CommandError::NotGit),
    }

    let subcommand = tokens.get(1).copied().unwrap_or("");
    let args = tokens.get(2..).unwrap_or(&[]);

    match subcommand {
        "init" => Ok(Command::Init),
        "status" => Ok(Command::Status),
        "log" => Ok(Command::Log),
        "add" => Ok(parse_add(args)),
        "commit" => parse_commit(args),
        "branch" => parse_branch(args),
        "checkout" => parse_checkout(args),
        "reset" => Ok(parse_reset(args)),
        "revert" => Ok(match args.first() {
            Some(id) => Command::Revert {
                commit: id.to_string(),
            },
            None => ignored("revert"),
        }),
        "stash" => Ok(parse_stash(args)),
        "remote" => Ok(parse_remote(args)),
        "push" => parse_push(args),
        "fetch" => Ok(Command::Fetch {
            remote: args.first().map(|s| s.to_string()),
        }),
        "pull" => Ok(Command::Pull {
            remote: args.first().map(|s| s.to_string()),
        }),
        "clone" => match args.first() {
            Some(url) => Ok(Command::Clone {
                url: url.to_string(),
            }),
            None => Err(CommandError::usage("Please provide a repository URL")),
        },
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn ignored(subcommand: &str) -> Command {
    Command::Ignored {
        subcommand: subcommand.to_string(),
    }
}

fn parse_add(args: &[&str]) -> Command {
    match args.first() {
        Some(&".") => Command::AddAll,
        Some(path) => Command::Add {
            path: path.to_string(),
        },
        None => ignored("add"),
    }
}

fn parse_commit(args: &[&str]) -> Result<Command, CommandError> {
    match args {
        ["-m", words @ ..] if !words.is_empty() => {
            let message = words.join(" ").replace(['\'', '"'], "");
            Ok(Command::Commit { message })
        }
        _ => Err(CommandError::usage(
            "please provide a commit message (-m \"message\")",
        )),
    }
}

fn parse_branch(args: &[&str]) -> Result<Command, CommandError> {
    match args {
        [] => Ok(Command::ListBranches),
        [flag, rest @ ..] if flag.starts_with('-') => {
            let name = rest
                .first()
                .ok_or_else(|| CommandError::usage("branch name required"))?;
            if *flag == "-d" || *flag == "-D" {
                Ok(Command::DeleteBranch {
                    name: name.to_string(),
                })
            } else {
                Ok(ignored("branch"))
            }
        }
        [name, ..] => Ok(Command::CreateBranch {
            name: BranchName::new(*name)?,
        }),
    }
}

fn parse_checkout(args: &[&str]) -> Result<Command, CommandError> {
    let missing = || CommandError::usage("please specify a branch name");
    match args {
        ["-b", rest @ ..] => {
            let name = rest.first().ok_or_else(missing)?;
            Ok(Command::CheckoutNew {
                name: BranchName::new(*name)?,
            })
        }
        [name, ..] => Ok(Command::Checkout {
            name: name.to_string(),
        }),
        [] => Err(missing()),
    }
}

fn parse_reset(args: &[&str]) -> Command {
    match args {
        ["--hard", id, ..] => Command::ResetHard {
            commit: id.to_string(),
        },
        _ => ignored("reset"),
    }
}

fn parse_stash(args: &[&str]) -> Command {
    match args {
        ["save", words @ ..] => Command::StashSave {
            message: (!words.is_empty()).then(|| words.join(" ")),
        },
        ["list", ..] => Command::StashList,
        ["pop", ..] => Command::StashPop,
        _ => ignored("stash"),
    }
}

fn parse_remote(args: &[&str]) -> Command {
    match args {
        ["add", name, url, ..] => Command::RemoteAdd {
            name: name.to_string(),
            url: url.to_string(),
        },
        ["show", name, ..] => Command::RemoteShow {
            name: name.to_string(),
        },
        _ => ignored("remote"),
    }
}

fn parse_push(args: &[&str]) -> Result<Command, CommandError> {
    let branch = args.get(1).map(|b| BranchName::new(*b)).transpose()?;
    Ok(Command::Push {
        remote: args.first().map(|s| s.to_string()),
        branch,
    })
}
