//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! When `--wire` is enabled, transcripts are printed as the single-line
//! wire blob (`\n` escapes) instead of one line per logical line.

use std::fmt::Display;

use crate::engine::Transcript;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a success message (respects quiet mode).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Render a transcript for the terminal.
///
/// Returns `None` for an empty transcript so callers print nothing at all
/// rather than a blank line.
pub fn render_transcript(transcript: &Transcript, wire: bool) -> Option<String> {
    if transcript.is_empty() {
        None
    } else if wire {
        Some(transcript.to_wire())
    } else {
        Some(transcript.to_string())
    }
}

/// Print a command transcript.
///
/// `Error: ...` transcripts are shown even in quiet mode.
pub fn transcript(transcript: &Transcript, wire: bool, verbosity: Verbosity) {
    let Some(rendered) = render_transcript(transcript, wire) else {
        return;
    };
    if transcript.is_error() {
        println!("{}", rendered);
    } else {
        print(rendered, verbosity);
    }
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_quiet_wins() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn render_lines_or_wire() {
        let t = Transcript::from_lines(["* main", "  feature"]);
        assert_eq!(render_transcript(&t, false).unwrap(), "* main\n  feature");
        assert_eq!(render_transcript(&t, true).unwrap(), "* main\\n  feature");
    }

    #[test]
    fn empty_transcript_renders_nothing() {
        assert!(render_transcript(&Transcript::new(), false).is_none());
    }

    #[test]
    fn format_list_prefixes() {
        assert_eq!(format_list(&["a", "b"], "  "), "  a\n  b");
    }
}
