//! engine
//!
//! The command interpreter: Parse -> Validate -> Plan.
//!
//! # Architecture
//!
//! 1. **Parse**: split the line and build a typed [`Command`]
//! 2. **Validate**: check the command against the current snapshot
//! 3. **Plan**: produce the pacing steps, the optional interim snapshot
//!    and the final snapshot plus transcript
//!
//! The engine never sleeps, publishes, or touches the live session; the
//! session replays the plan.
//!
//! # Invariants
//!
//! - The input snapshot is never mutated
//! - A user error yields `Error: ...` and the very same snapshot
//! - Only [`InternalError`] escapes the interpreter
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use git_playground::core::environment::{Environment, FixedEnvironment};
//! use git_playground::core::state::{RepoState, Template};
//! use git_playground::engine::Interpreter;
//!
//! let env = FixedEnvironment::new();
//! let template = Template::default();
//! let state = Arc::new(RepoState::with_sample_files(&template, env.now()));
//!
//! let interpreter = Interpreter::new(&env, &template);
//! let plan = interpreter.plan(&state, "git add .").unwrap();
//! assert_eq!(plan.outcome.transcript.to_string(), "Changes staged successfully");
//! assert_eq!(plan.outcome.state.staging_area.len(), 3);
//!
//! let plan = interpreter.plan(&state, "git checkout nowhere").unwrap();
//! assert!(Arc::ptr_eq(&state, &plan.outcome.state));
//! ```

pub mod command;
pub mod errors;
pub mod interpret;
pub mod plan;
pub mod transcript;

mod branch;
mod history;
mod remote;
mod stash;
mod worktree;

pub use command::{parse, Command};
pub use errors::{CommandError, InternalError};
pub use interpret::Interpreter;
pub use plan::{Outcome, Plan, PlanStep};
pub use remote::{repo_name, REMOTE_AUTHOR, REMOTE_EMAIL};
pub use transcript::Transcript;
