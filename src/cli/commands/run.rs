//! run command - Execute command lines non-interactively

use std::path::Path;

use anyhow::{bail, Context as _, Result};

use crate::cli::Context;
use crate::core::state::RepoState;
use crate::core::verify;
use crate::session::Session;
use crate::ui::output;

/// Execute `lines` in order, printing each transcript.
pub fn run(
    ctx: &Context,
    lines: &[String],
    state: Option<&Path>,
    fresh: bool,
    dump: bool,
) -> Result<()> {
    let mut builder = ctx.session();
    if let Some(path) = state {
        builder = builder.state(load_state(path)?);
    }
    let session = builder.build();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        replay(ctx, &session, lines, fresh, true).await?;
        if dump {
            let json = serde_json::to_string_pretty(&*session.state())
                .context("failed to serialize state")?;
            println!("{}", json);
        }
        Ok(())
    })
}

/// Feed `lines` to the session one by one.
///
/// With `show` unset, transcripts are not printed; errors still surface as
/// warnings so scripted callers see them.
pub(crate) async fn replay(
    ctx: &Context,
    session: &Session,
    lines: &[String],
    fresh: bool,
    show: bool,
) -> Result<()> {
    if fresh {
        let report = session.reset().await;
        if show {
            output::transcript(&report.transcript, ctx.wire, ctx.verbosity);
        }
    }

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        output::debug(format!("$ {line}"), ctx.verbosity);
        let report = session.execute(line).await?;
        if show {
            output::transcript(&report.transcript, ctx.wire, ctx.verbosity);
        } else if report.transcript.is_error() {
            output::warn(format!("{line}: {}", report.transcript), ctx.verbosity);
        }
    }
    Ok(())
}

/// Read a JSON state dump and check it before use.
pub(crate) fn load_state(path: &Path) -> Result<RepoState> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read state from {}", path.display()))?;
    let state: RepoState = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse state in {}", path.display()))?;

    let result = verify::verify(&state);
    if !result.ok {
        let reasons: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
        bail!(
            "state in {} is inconsistent:\n{}",
            path.display(),
            output::format_list(&reasons, "  - ")
        );
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Template;
    use crate::core::types::UtcTimestamp;
    use std::io::Write;

    fn write(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_dump() {
        let state = RepoState::with_sample_files(&Template::default(), UtcTimestamp::now());
        let file = write(&serde_json::to_string(&state).unwrap());

        assert_eq!(load_state(file.path()).unwrap(), state);
    }

    #[test]
    fn rejects_inconsistent_dump() {
        let mut state = RepoState::initial(&Template::default(), UtcTimestamp::now());
        state.branches.clear();
        let file = write(&serde_json::to_string(&state).unwrap());

        let err = load_state(file.path()).unwrap_err().to_string();
        assert!(err.contains("inconsistent"));
    }

    #[test]
    fn rejects_garbage() {
        let file = write("{ not json");
        assert!(load_state(file.path()).is_err());
    }
}
