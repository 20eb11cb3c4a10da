//! session
//!
//! The session controller: owns the live snapshot and replays plans.
//!
//! # Architecture
//!
//! ```text
//! execute(line)
//!   acquire busy ──> interpret ──> publish interim ──> pace steps ──> install outcome
//!                                                                        │
//!                                          events: Busy / Progress / Interim / Published
//! ```
//!
//! The interpreter is pure; everything observable (pacing, progress lines,
//! the published snapshot) happens here. Listeners subscribe to a
//! broadcast channel of [`SessionEvent`]s, and every operation also
//! returns a report to its direct caller.
//!
//! # Invariants
//!
//! - At most one command is in flight; a second `execute` while busy is
//!   dropped with [`SessionError::Busy`], never queued
//! - `reset` is never gated, but the session reads as busy while it runs,
//!   so no command or file change starts during a reset. A command still in
//!   flight when a reset starts reports to its caller but its snapshot is
//!   discarded (detected through the session epoch)
//! - The snapshot lock is never held across an await
//!
//! # Example
//!
//! ```
//! use git_playground::core::environment::FixedEnvironment;
//! use git_playground::session::{pacer::InstantPacer, Session};
//!
//! # tokio_test::block_on(async {
//! let session = Session::builder()
//!     .pacer(InstantPacer)
//!     .environment(FixedEnvironment::new())
//!     .build();
//!
//! session.reset().await;
//! let report = session.execute("git add .").await.unwrap();
//! assert_eq!(report.transcript.to_string(), "Changes staged successfully");
//! assert!(report.changed);
//! assert_eq!(session.state().staging_area.len(), 3);
//! # });
//! ```

pub mod pacer;

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;

use crate::core::environment::{Environment, SystemEnvironment};
use crate::core::state::{RepoState, StagedFile, Template, WorkingFile, WorkingStatus};
use crate::core::verify;
use crate::engine::{Interpreter, Plan, PlanStep, Transcript};
use crate::ui::output::{debug, Verbosity};

use pacer::{Pacer, TokioPacer};

/// Capacity of the event channel. Slow listeners lag rather than block.
const EVENT_CAPACITY: usize = 100;

const RESET_DELAY: Duration = Duration::from_millis(800);
pub const RESET_PROGRESS: &str = "Resetting playground...";
pub const RESET_MESSAGE: &str = "Playground has been reset to initial state with sample files";

/// Errors from session entry points.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a command is already running")]
    Busy,

    #[error("invalid file path: '{0}'")]
    InvalidPath(String),
}

/// Something listeners may want to render.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The busy flag changed.
    Busy(bool),
    /// An intermediate line from a running command or reset.
    Progress(String),
    /// A display-only snapshot shown while a command runs.
    Interim(Arc<RepoState>),
    /// A durable snapshot and the output that goes with it.
    Published {
        state: Arc<RepoState>,
        transcript: Transcript,
    },
}

/// What an operation did, for its direct caller.
#[derive(Debug, Clone)]
pub struct CommandReport {
    pub state: Arc<RepoState>,
    pub transcript: Transcript,
    /// The snapshot fingerprint differs from the one before the command.
    pub changed: bool,
    /// A reset overtook the command, so its snapshot was thrown away.
    pub discarded: bool,
}

/// The live playground.
#[derive(Debug)]
pub struct Session {
    state: Mutex<Arc<RepoState>>,
    busy: AtomicBool,
    /// Resets in progress.
    resetting: AtomicUsize,
    epoch: AtomicU64,
    events: broadcast::Sender<SessionEvent>,
    pacer: Arc<dyn Pacer>,
    env: Arc<dyn Environment>,
    template: Template,
    verbosity: Verbosity,
}

/// Builder for [`Session`].
#[derive(Debug)]
pub struct SessionBuilder {
    pacer: Arc<dyn Pacer>,
    env: Arc<dyn Environment>,
    template: Template,
    verbosity: Verbosity,
    state: Option<RepoState>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            pacer: Arc::new(TokioPacer::default()),
            env: Arc::new(SystemEnvironment),
            template: Template::default(),
            verbosity: Verbosity::Normal,
            state: None,
        }
    }
}

impl SessionBuilder {
    pub fn pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Arc::new(pacer);
        self
    }

    pub fn environment(mut self, env: impl Environment + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    pub fn template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Start from a given snapshot instead of a fresh repository.
    pub fn state(mut self, state: RepoState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn build(self) -> Session {
        let state = self
            .state
            .unwrap_or_else(|| RepoState::initial(&self.template, self.env.now()));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Session {
            state: Mutex::new(Arc::new(state)),
            busy: AtomicBool::new(false),
            resetting: AtomicUsize::new(0),
            epoch: AtomicU64::new(0),
            events,
            pacer: self.pacer,
            env: self.env,
            template: self.template,
            verbosity: self.verbosity,
        }
    }
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// The current snapshot.
    pub fn state(&self) -> Arc<RepoState> {
        Arc::clone(&*self.lock())
    }

    /// Whether a command or a reset is in flight. Adapters gate input on this.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst) || self.resetting.load(Ordering::SeqCst) > 0
    }

    /// Listen for events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Run one command line.
    ///
    /// User mistakes come back inside the report as `Error: ...` with the
    /// snapshot untouched; so do simulator faults.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] if another command is running.
    pub async fn execute(&self, line: &str) -> Result<CommandReport, SessionError> {
        let _busy = self.acquire()?;
        let epoch = self.epoch.load(Ordering::SeqCst);
        let before = self.state();

        debug(format!("interpret: {line}"), self.verbosity);
        let plan = match Interpreter::new(self.env.as_ref(), &self.template).plan(&before, line) {
            Ok(plan) => plan,
            Err(err) => {
                debug(format!("internal fault: {err}"), self.verbosity);
                Plan::unchanged(&before, Transcript::error(&err))
            }
        };
        debug(
            format!(
                "plan: {} steps, {}ms",
                plan.steps.len(),
                plan.total_delay().as_millis()
            ),
            self.verbosity,
        );

        if let Some(interim) = &plan.interim {
            if self.install_if(epoch, Arc::clone(interim)) {
                self.emit(SessionEvent::Interim(Arc::clone(interim)));
            }
        }

        for step in &plan.steps {
            match step {
                PlanStep::Wait(delay) => self.pacer.pause(*delay).await,
                PlanStep::Progress(line) => self.emit(SessionEvent::Progress(line.clone())),
            }
        }

        let outcome = plan.outcome;
        let discarded = !self.install_if(epoch, Arc::clone(&outcome.state));
        if discarded {
            debug("publish: skipped, session was reset", self.verbosity);
        } else {
            self.check(&outcome.state);
            debug("publish", self.verbosity);
            self.emit(SessionEvent::Published {
                state: Arc::clone(&outcome.state),
                transcript: outcome.transcript.clone(),
            });
        }

        Ok(CommandReport {
            changed: before.fingerprint() != outcome.state.fingerprint(),
            state: outcome.state,
            transcript: outcome.transcript,
            discarded,
        })
    }

    /// Throw the repository away and start over with the sample files.
    ///
    /// Never gated by the busy flag, but holds the session busy until done.
    pub async fn reset(&self) -> CommandReport {
        let _resetting = ResetGuard::enter(self);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let before = self.state();

        self.emit(SessionEvent::Progress(RESET_PROGRESS.to_string()));
        self.pacer.pause(RESET_DELAY).await;

        let state = Arc::new(RepoState::with_sample_files(&self.template, self.env.now()));
        self.epoch.fetch_add(1, Ordering::SeqCst);
        *self.lock() = Arc::clone(&state);
        debug("reset: installed fresh repository", self.verbosity);

        let transcript = Transcript::line(RESET_MESSAGE);
        self.emit(SessionEvent::Published {
            state: Arc::clone(&state),
            transcript: transcript.clone(),
        });

        CommandReport {
            changed: before.fingerprint() != state.fingerprint(),
            state,
            transcript,
            discarded: false,
        }
    }

    /// Pretend the user edited `path` outside of git.
    ///
    /// A new path appears as untracked. A known working entry stays as is
    /// unless it was deleted, which becomes modified. A staged entry moves
    /// back to the working directory as modified.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidPath`] for a blank path,
    /// [`SessionError::Busy`] while a command or reset runs.
    pub fn simulate_file_change(&self, path: &str) -> Result<CommandReport, SessionError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(SessionError::InvalidPath(path.to_string()));
        }
        let _busy = self.acquire()?;
        let epoch = self.epoch.load(Ordering::SeqCst);

        let before = self.state();
        let state = Arc::new(touch(&before, path));
        let transcript = Transcript::new();

        let discarded = !self.install_if(epoch, Arc::clone(&state));
        if discarded {
            debug(format!("touch: {path} skipped, session was reset"), self.verbosity);
        } else {
            debug(format!("touch: {path}"), self.verbosity);
            self.check(&state);
            self.emit(SessionEvent::Published {
                state: Arc::clone(&state),
                transcript: transcript.clone(),
            });
        }

        Ok(CommandReport {
            changed: !discarded && before.fingerprint() != state.fingerprint(),
            state,
            transcript,
            discarded,
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Arc<RepoState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(&self) -> Result<BusyGuard<'_>, SessionError> {
        if self.resetting.load(Ordering::SeqCst) > 0 {
            return Err(SessionError::Busy);
        }
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| SessionError::Busy)?;
        self.emit(SessionEvent::Busy(true));
        Ok(BusyGuard { session: self })
    }

    /// Install `state` unless a reset happened since `epoch`.
    fn install_if(&self, epoch: u64, state: Arc<RepoState>) -> bool {
        let mut cell = self.lock();
        if self.epoch.load(Ordering::SeqCst) != epoch {
            return false;
        }
        *cell = state;
        true
    }

    fn emit(&self, event: SessionEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    fn check(&self, state: &RepoState) {
        if self.verbosity != Verbosity::Debug {
            return;
        }
        let result = verify::verify(state);
        if result.ok {
            debug("verify: ok", self.verbosity);
        }
        for err in &result.errors {
            debug(format!("verify: {err}"), self.verbosity);
        }
    }
}

/// Clears the busy flag when the operation ends, however it ends.
struct BusyGuard<'a> {
    session: &'a Session,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.session.busy.store(false, Ordering::SeqCst);
        self.session.emit(SessionEvent::Busy(self.session.is_busy()));
    }
}

/// Marks a reset in progress for as long as it lives.
struct ResetGuard<'a> {
    session: &'a Session,
}

impl<'a> ResetGuard<'a> {
    fn enter(session: &'a Session) -> Self {
        session.resetting.fetch_add(1, Ordering::SeqCst);
        session.emit(SessionEvent::Busy(true));
        Self { session }
    }
}

impl Drop for ResetGuard<'_> {
    fn drop(&mut self) {
        self.session.resetting.fetch_sub(1, Ordering::SeqCst);
        self.session.emit(SessionEvent::Busy(self.session.is_busy()));
    }
}

fn touch(state: &RepoState, path: &str) -> RepoState {
    let mut next = state.clone();

    if let Some(index) = next.staging_area.iter().position(|f| f.path == path) {
        let StagedFile { path, .. } = next.staging_area.remove(index);
        next.working_directory.retain(|f| f.path != path);
        next.working_directory.push(WorkingFile {
            path,
            status: WorkingStatus::Modified,
        });
        return next;
    }

    match next.working_directory.iter_mut().find(|f| f.path == path) {
        Some(file) if file.status == WorkingStatus::Deleted => {
            file.status = WorkingStatus::Modified;
        }
        Some(_) => {}
        None => next.working_directory.push(WorkingFile::untracked(path)),
    }
    next
}
