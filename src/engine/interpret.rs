//! engine::interpret
//!
//! The command interpreter: `(snapshot, line) -> Plan`.
//!
//! # Architecture
//!
//! ```text
//! line -> parse -> Command -> handler(ctx) -> Plan
//! ```
//!
//! Handlers live in one module per subcommand family and all share the
//! same shape: they read the current snapshot through a [`Ctx`], validate,
//! and either reject with a [`CommandError`] or clone the snapshot, edit
//! the clone and return it inside a [`Plan`].
//!
//! # Invariants
//!
//! - The input snapshot is never mutated
//! - Any [`CommandError`] becomes a rejected plan holding the input `Arc`
//! - Only [`InternalError`] escapes
//! - No I/O, no sleeping; time and ids come from the [`Environment`]

use std::sync::Arc;

use super::command::{self, Command};
use super::errors::{CommandError, HandlerError, InternalError};
use super::plan::Plan;
use super::{branch, history, remote, stash, worktree};
use crate::core::environment::Environment;
use crate::core::state::{Branch, Commit, RepoState, Template};
use crate::core::types::CommitId;

pub(crate) type HandlerResult = Result<Plan, HandlerError>;

/// Turns command lines into plans.
#[derive(Debug, Clone, Copy)]
pub struct Interpreter<'a> {
    env: &'a dyn Environment,
    template: &'a Template,
}

impl<'a> Interpreter<'a> {
    pub fn new(env: &'a dyn Environment, template: &'a Template) -> Self {
        Self { env, template }
    }

    /// Parse and interpret one line against `state`.
    ///
    /// # Errors
    ///
    /// Returns [`InternalError`] only for simulator faults. Every user
    /// mistake is reported inside the returned plan.
    pub fn plan(&self, state: &Arc<RepoState>, line: &str) -> Result<Plan, InternalError> {
        match command::parse(line) {
            Ok(cmd) => self.plan_command(state, &cmd),
            Err(err) => Ok(Plan::rejected(state, err)),
        }
    }

    /// Interpret an already parsed command.
    pub fn plan_command(
        &self,
        state: &Arc<RepoState>,
        cmd: &Command,
    ) -> Result<Plan, InternalError> {
        let ctx = Ctx {
            state,
            env: self.env,
            template: self.template,
        };

        let result = match cmd {
            Command::Init => worktree::init(&ctx),
            Command::Status => worktree::status(&ctx),
            Command::AddAll => worktree::add_all(&ctx),
            Command::Add { path } => worktree::add(&ctx, path),
            Command::Log => history::log(&ctx),
            Command::Commit { message } => history::commit(&ctx, message),
            Command::ResetHard { commit } => history::reset_hard(&ctx, commit),
            Command::Revert { commit } => history::revert(&ctx, commit),
            Command::ListBranches => branch::list(&ctx),
            Command::CreateBranch { name } => branch::create(&ctx, name),
            Command::DeleteBranch { name } => branch::delete(&ctx, name),
            Command::CheckoutNew { name } => branch::checkout_new(&ctx, name),
            Command::Checkout { name } => branch::checkout(&ctx, name),
            Command::StashSave { message } => stash::save(&ctx, message.as_deref()),
            Command::StashList => stash::list(&ctx),
            Command::StashPop => stash::pop(&ctx),
            Command::RemoteAdd { name, url } => remote::add(&ctx, name, url),
            Command::RemoteShow { name } => remote::show(&ctx, name),
            Command::Push {
                remote: name,
                branch,
            } => remote::push(&ctx, name.as_deref(), branch.as_ref()),
            Command::Fetch { remote: name } => remote::fetch(&ctx, name.as_deref()),
            Command::Pull { remote: name } => remote::pull(&ctx, name.as_deref()),
            Command::Clone { url } => remote::clone(&ctx, url),
            Command::Ignored { .. } => Ok(Plan::unchanged(state, Default::default())),
        };

        match result {
            Ok(plan) => Ok(plan),
            Err(HandlerError::Command(err)) => Ok(Plan::rejected(state, err)),
            Err(HandlerError::Internal(err)) => Err(err),
        }
    }
}

/// What a handler can see.
pub(crate) struct Ctx<'a> {
    pub state: &'a Arc<RepoState>,
    pub env: &'a dyn Environment,
    pub template: &'a Template,
}

impl Ctx<'_> {
    /// A private copy of the snapshot to edit.
    pub fn draft(&self) -> RepoState {
        RepoState::clone(self.state)
    }

    /// The checked-out branch.
    pub fn current(&self) -> Result<&Branch, InternalError> {
        self.state
            .current()
            .ok_or_else(|| InternalError::MissingCurrentBranch(self.state.current_branch.to_string()))
    }

    /// Look a commit up by its textual id.
    pub fn find_commit(&self, id: &str) -> Result<&Commit, CommandError> {
        self.state
            .commits
            .iter()
            .find(|c| c.id == *id)
            .ok_or_else(|| CommandError::not_found(format!("commit {id} does not exist")))
    }

    /// A commit id that is not yet used locally or on any remote.
    pub fn fresh_commit_id(&self) -> Result<CommitId, InternalError> {
        let id = CommitId::new(self.env.fresh_token())?;
        let taken = self.state.contains_commit(&id)
            || self.state.remotes.iter().any(|r| r.commit(&id).is_some());
        if taken {
            return Err(InternalError::IdCollision(id.to_string()));
        }
        Ok(id)
    }

    /// A stash id that is not yet used.
    pub fn fresh_stash_id(&self) -> Result<String, InternalError> {
        let id = self.env.fresh_token();
        if self.state.stash.iter().any(|e| e.id == id) {
            return Err(InternalError::IdCollision(id));
        }
        Ok(id)
    }
}

pub(crate) fn missing_current(state: &RepoState) -> InternalError {
    InternalError::MissingCurrentBranch(state.current_branch.to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::core::environment::FixedEnvironment;
    use crate::engine::transcript::Transcript;

    /// Interpreter fixture with a deterministic environment.
    pub struct Harness {
        pub env: FixedEnvironment,
        pub template: Template,
        pub state: Arc<RepoState>,
    }

    impl Harness {
        /// Fresh repository with the default sample files.
        pub fn new() -> Self {
            let env = FixedEnvironment::new();
            let template = Template::default();
            let state = Arc::new(RepoState::with_sample_files(&template, env.now()));
            Self {
                env,
                template,
                state,
            }
        }

        /// Fresh repository without sample files.
        pub fn bare() -> Self {
            let mut h = Self::new();
            h.state = Arc::new(RepoState::initial(&h.template, h.env.now()));
            h
        }

        pub fn plan(&self, line: &str) -> Plan {
            Interpreter::new(&self.env, &self.template)
                .plan(&self.state, line)
                .unwrap()
        }

        /// Interpret and install the resulting state.
        pub fn run(&mut self, line: &str) -> Transcript {
            let plan = self.plan(line);
            self.state = plan.outcome.state;
            plan.outcome.transcript
        }

        /// Run and assert the line is rejected without changing state.
        pub fn reject(&mut self, line: &str) -> String {
            let before = Arc::clone(&self.state);
            let plan = self.plan(line);
            assert!(
                Arc::ptr_eq(&before, &plan.outcome.state),
                "rejected command changed state: {line}"
            );
            assert!(plan.steps.is_empty());
            assert!(plan.outcome.transcript.is_error(), "{line}");
            plan.outcome.transcript.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Harness;
    use super::*;

    #[test]
    fn parse_errors_become_rejections() {
        let mut h = Harness::new();
        assert_eq!(h.reject("hello"), "Error: Not a git command");
        assert_eq!(
            h.reject("git bisect"),
            "Error: unknown git command 'bisect'"
        );
    }

    #[test]
    fn ignored_shapes_are_silent_noops() {
        let h = Harness::new();
        for line in ["git add", "git stash", "git reset", "git revert", "git remote"] {
            let plan = h.plan(line);
            assert!(Arc::ptr_eq(&h.state, &plan.outcome.state), "{line}");
            assert!(plan.outcome.transcript.is_empty(), "{line}");
            assert!(plan.steps.is_empty(), "{line}");
        }
    }

    #[test]
    fn missing_current_branch_is_internal() {
        let h = Harness::new();
        let mut broken = (*h.state).clone();
        broken.branches.clear();
        let broken = Arc::new(broken);

        let result = Interpreter::new(&h.env, &h.template).plan(&broken, "git branch feature");
        assert!(matches!(
            result,
            Err(InternalError::MissingCurrentBranch(_))
        ));
    }

    #[test]
    fn reused_token_is_id_collision() {
        #[derive(Debug)]
        struct Stuck;
        impl Environment for Stuck {
            fn fresh_token(&self) -> String {
                "initial".to_string()
            }
            fn now(&self) -> crate::core::types::UtcTimestamp {
                crate::core::types::UtcTimestamp::from_millis(0).unwrap()
            }
        }

        let mut h = Harness::new();
        h.run("git add .");
        let template = Template::default();
        let result = Interpreter::new(&Stuck, &template).plan(&h.state, "git commit -m x");

        assert_eq!(
            result.unwrap_err(),
            InternalError::IdCollision("initial".into())
        );
    }
}
