//! core
//!
//! Core domain types and schemas for the playground.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, CommitId, UtcTimestamp, Fingerprint
//! - [`state`] - The repository aggregate and its records
//! - [`environment`] - Id and clock sources
//! - [`verify`] - Invariant checks over a snapshot
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Snapshots are plain values; nothing here performs I/O except config loading
//! - All verification is deterministic

pub mod config;
pub mod environment;
pub mod state;
pub mod types;
pub mod verify;
