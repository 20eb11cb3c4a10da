//! repl command - Interactive terminal adapter
//!
//! Reads lines from stdin, runs git lines through the session and prints
//! progress as it happens. Lines starting with `:` drive the playground
//! itself.

use std::io::Write;

use anyhow::{Context as _, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use crate::cli::Context;
use crate::core::state::RepoState;
use crate::session::{CommandReport, Session, SessionEvent};
use crate::ui::graph::GraphView;
use crate::ui::output;

const PROMPT: &str = "$ ";

const HELP: [&str; 6] = [
    ":help            list playground commands",
    ":reset           start over with the sample files",
    ":touch <path>    pretend a file was edited outside git",
    ":graph           print the commit graph as JSON",
    ":state           print the raw repository state as JSON",
    ":quit            leave (also: exit)",
];

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Quit,
    Help,
    Reset,
    Touch(&'a str),
    Graph,
    State,
    /// A `:` command we do not know.
    Unknown(&'a str),
    /// Anything else goes to the session, `git` or not.
    Line(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if line == "exit" {
        return Input::Quit;
    }
    let Some(meta) = line.strip_prefix(':') else {
        return Input::Line(line);
    };

    let (name, rest) = meta.split_once(char::is_whitespace).unwrap_or((meta, ""));
    match name {
        "q" | "quit" => Input::Quit,
        "h" | "help" => Input::Help,
        "reset" => Input::Reset,
        "touch" => Input::Touch(rest.trim()),
        "graph" => Input::Graph,
        "state" => Input::State,
        _ => Input::Unknown(line),
    }
}

/// Start the interactive session.
pub fn repl(ctx: &Context) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(repl_async(ctx))
}

async fn repl_async(ctx: &Context) -> Result<()> {
    let session = ctx.session().build();
    let mut events = session.subscribe();

    output::print(
        "Git playground. Type git commands, or :help for playground commands.",
        ctx.verbosity,
    );
    let report = session.reset().await;
    show(ctx, &mut events, &report);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if ctx.verbosity != output::Verbosity::Quiet {
            print!("{PROMPT}");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };

        match classify(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::Help => output::print(output::format_list(&HELP, "  "), ctx.verbosity),
            Input::Reset => {
                let report = session.reset().await;
                show(ctx, &mut events, &report);
            }
            Input::Touch(path) => match session.simulate_file_change(path) {
                Ok(report) => {
                    output::success(format!("touched {}", path), ctx.verbosity);
                    show(ctx, &mut events, &report);
                }
                Err(err) => output::error(err),
            },
            Input::Graph => {
                let json = GraphView::project(&session.state())
                    .to_json()
                    .context("failed to serialize graph")?;
                println!("{}", json);
            }
            Input::State => println!("{}", dump(&session.state())?),
            Input::Unknown(cmd) => output::error(format!("unknown playground command '{cmd}'")),
            Input::Line(line) => {
                let result = execute(&session, &mut events, ctx, line).await;
                match result {
                    Ok(report) => show(ctx, &mut events, &report),
                    Err(err) => output::error(err),
                }
            }
        }
    }

    Ok(())
}

/// Run one line, printing progress lines while the command is in flight.
async fn execute(
    session: &Session,
    events: &mut broadcast::Receiver<SessionEvent>,
    ctx: &Context,
    line: &str,
) -> Result<CommandReport> {
    let running = session.execute(line);
    tokio::pin!(running);

    loop {
        tokio::select! {
            biased;
            event = events.recv() => {
                if let Ok(SessionEvent::Progress(progress)) = event {
                    output::print(progress, ctx.verbosity);
                }
            }
            report = &mut running => return Ok(report?),
        }
    }
}

/// Print progress still queued, then the transcript.
fn show(ctx: &Context, events: &mut broadcast::Receiver<SessionEvent>, report: &CommandReport) {
    drain(ctx, events);
    if report.discarded {
        output::warn("the playground was reset while this command ran", ctx.verbosity);
    }
    output::transcript(&report.transcript, ctx.wire, ctx.verbosity);
}

fn drain(ctx: &Context, events: &mut broadcast::Receiver<SessionEvent>) {
    loop {
        match events.try_recv() {
            Ok(SessionEvent::Progress(progress)) => output::print(progress, ctx.verbosity),
            Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            Err(_) => break,
        }
    }
}

fn dump(state: &RepoState) -> Result<String> {
    serde_json::to_string_pretty(state).context("failed to serialize state")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_meta_commands() {
        assert_eq!(classify("   "), Input::Empty);
        assert_eq!(classify(":quit"), Input::Quit);
        assert_eq!(classify("exit"), Input::Quit);
        assert_eq!(classify(":reset"), Input::Reset);
        assert_eq!(classify(":touch  notes.txt "), Input::Touch("notes.txt"));
        assert_eq!(classify(":touch"), Input::Touch(""));
        assert_eq!(classify(":graph"), Input::Graph);
        assert_eq!(classify(":bogus x"), Input::Unknown(":bogus x"));
    }

    #[test]
    fn everything_else_goes_to_the_session() {
        assert_eq!(classify(" git status "), Input::Line("git status"));
        assert_eq!(classify("ls -la"), Input::Line("ls -la"));
    }
}
