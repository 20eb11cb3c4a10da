//! graph command - Print the commit graph projection as JSON

use anyhow::{Context as _, Result};

use super::run::replay;
use crate::cli::Context;
use crate::ui::graph::GraphView;

/// Run `lines` quietly, then print the projection of the resulting state.
pub fn graph(ctx: &Context, lines: &[String], fresh: bool) -> Result<()> {
    let session = ctx.session().build();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(replay(ctx, &session, lines, fresh, false))?;

    let json = GraphView::project(&session.state())
        .to_json()
        .context("failed to serialize graph")?;
    println!("{}", json);
    Ok(())
}
