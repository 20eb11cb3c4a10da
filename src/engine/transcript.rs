//! engine::transcript
//!
//! The text a command produces.
//!
//! A transcript is a list of lines. Terminals render it with real newlines;
//! the wire form used by the playground's data model joins the lines with
//! the literal two-character sequence `\n`.

use serde::{Deserialize, Serialize};

use super::errors::CommandError;

/// Separator used by the wire form: a backslash followed by `n`.
pub const WIRE_SEPARATOR: &str = "\\n";

/// Output of a single command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    /// An empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-line transcript.
    pub fn line(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
        }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// The one-line report of a rejected command.
    pub fn error(err: &impl std::fmt::Display) -> Self {
        Self::line(format!("Error: {err}"))
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True if this transcript reports a rejected command.
    pub fn is_error(&self) -> bool {
        self.lines
            .first()
            .is_some_and(|line| line.starts_with("Error:"))
    }

    /// Join with the literal `\n` separator.
    pub fn to_wire(&self) -> String {
        self.lines.join(WIRE_SEPARATOR)
    }
}

impl From<CommandError> for Transcript {
    fn from(err: CommandError) -> Self {
        Transcript::error(&err)
    }
}

impl std::fmt::Display for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_uses_literal_backslash_n() {
        let t = Transcript::from_lines(["On branch main", "HEAD -> initial"]);
        assert_eq!(t.to_wire(), "On branch main\\nHEAD -> initial");
        assert_eq!(t.to_string(), "On branch main\nHEAD -> initial");
    }

    #[test]
    fn wire_form_keeps_blank_lines() {
        let t = Transcript::from_lines(["a", "", "b", ""]);
        let wire = t.to_wire();
        assert_eq!(wire, "a\\n\\nb\\n");
    }

    #[test]
    fn empty_transcript_has_empty_wire() {
        assert_eq!(Transcript::new().to_wire(), "");
    }

    #[test]
    fn errors_are_prefixed() {
        let t: Transcript = CommandError::NotGit.into();
        assert_eq!(t.lines(), ["Error: Not a git command"]);
        assert!(t.is_error());
        assert!(!Transcript::line("Created branch 'x'").is_error());
    }

    #[test]
    fn serializes_as_array() {
        let t = Transcript::from_lines(["x", "y"]);
        assert_eq!(serde_json::to_string(&t).unwrap(), r#"["x","y"]"#);
    }
}
