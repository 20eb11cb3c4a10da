//! gitplay - a sandboxed, in-memory Git playground
//!
//! The playground simulates a Git repository entirely in memory so that
//! learners can type real `git` command lines and watch branches, commits,
//! the staging area, the stash and simulated remotes change. Nothing ever
//! touches the disk or the network.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`core`] - Domain types, the repository snapshot, verification, config
//! - [`engine`] - Parse → Validate → Plan; a pure command interpreter
//! - [`session`] - Owns the live snapshot, paces and publishes plans
//! - [`ui`] - Output helpers and the commit graph projection
//! - [`cli`] - Command-line interface layer (parses args, drives a session)
//!
//! # Correctness Invariants
//!
//! 1. Snapshots are immutable values; every change produces a new one
//! 2. A rejected command leaves the very same snapshot in place
//! 3. At most one command is in flight per session
//! 4. Only the session installs snapshots

pub mod cli;
pub mod core;
pub mod engine;
pub mod session;
pub mod ui;
