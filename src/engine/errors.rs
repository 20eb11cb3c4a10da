//! engine::errors
//!
//! Error types for parsing and interpretation.
//!
//! # Taxonomy
//!
//! - [`CommandError`] - a user-facing rejection. It never escapes the
//!   interpreter: it becomes an `Error: ...` transcript and the state is
//!   left untouched.
//! - [`InternalError`] - a failure of the simulator itself (an id source
//!   that repeats, a snapshot missing its current branch). It is returned
//!   to the session, which reports it and keeps the old state.

use thiserror::Error;

use crate::core::types::TypeError;

/// A command rejected by parsing or validation.
///
/// `Display` is the bare message; the transcript adds the `Error: ` prefix.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The line does not start with `git`.
    #[error("Not a git command")]
    NotGit,

    #[error("unknown git command '{0}'")]
    UnknownCommand(String),

    /// Malformed arguments.
    #[error("{0}")]
    Usage(String),

    /// A named branch, commit, remote or path does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The command is well formed but cannot run against this state.
    #[error("{0}")]
    Precondition(String),
}

impl CommandError {
    pub fn usage(message: impl Into<String>) -> Self {
        CommandError::Usage(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CommandError::NotFound(message.into())
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        CommandError::Precondition(message.into())
    }
}

impl From<TypeError> for CommandError {
    fn from(e: TypeError) -> Self {
        CommandError::Usage(e.to_string())
    }
}

/// A failure of the simulator rather than of the user's command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InternalError {
    /// The id source produced a token that is already in use.
    #[error("generated id '{0}' collides with an existing id")]
    IdCollision(String),

    #[error("current branch '{0}' is missing from the repository")]
    MissingCurrentBranch(String),

    #[error(transparent)]
    InvalidId(#[from] TypeError),
}

/// Error returned by a command handler.
///
/// Lets handlers use `?` on both kinds of failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HandlerError {
    Command(CommandError),
    Internal(InternalError),
}

impl From<CommandError> for HandlerError {
    fn from(e: CommandError) -> Self {
        HandlerError::Command(e)
    }
}

impl From<InternalError> for HandlerError {
    fn from(e: InternalError) -> Self {
        HandlerError::Internal(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{BranchName, CommitId};

    #[test]
    fn messages_are_bare() {
        assert_eq!(CommandError::NotGit.to_string(), "Not a git command");
        assert_eq!(
            CommandError::UnknownCommand("frobnicate".into()).to_string(),
            "unknown git command 'frobnicate'"
        );
        assert_eq!(
            CommandError::precondition("No changes to stash").to_string(),
            "No changes to stash"
        );
    }

    #[test]
    fn type_errors_become_usage() {
        let err: CommandError = BranchName::new("a..b").unwrap_err().into();
        assert!(matches!(err, CommandError::Usage(_)));
        assert!(err.to_string().contains("cannot contain '..'"));
    }

    #[test]
    fn handler_error_wraps_both() {
        let a: HandlerError = CommandError::NotGit.into();
        let b: HandlerError = InternalError::IdCollision("abc".into()).into();
        assert!(matches!(a, HandlerError::Command(_)));
        assert!(matches!(b, HandlerError::Internal(_)));
    }

    #[test]
    fn invalid_id_keeps_its_cause_when_cloned() {
        let err: InternalError = CommitId::new("has space").unwrap_err().into();
        let copy = err.clone();
        assert_eq!(copy, err);
        assert!(copy.to_string().starts_with("invalid commit id"));
    }
}
