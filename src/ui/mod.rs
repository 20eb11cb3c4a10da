//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//! - [`graph`] - Commit graph projection for visualizers
//!
//! # Design
//!
//! All terminal output goes through [`output`] so verbosity and the wire
//! format are honored everywhere. [`graph`] only reads snapshots.

pub mod graph;
pub mod output;
