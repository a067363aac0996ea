//! Tag subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct TagsCommand {
    #[command(subcommand)]
    pub command: TagsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TagsSubcommand {
    /// Add a tag
    Add { tag: String },

    /// Rename a tag
    Rename { old: String, new: String },
}

pub async fn handle(ctx: &AppContext, cmd: TagsCommand) -> Result<()> {
    ctx.authenticate().await?;

    let user = match cmd.command {
        TagsSubcommand::Add { tag } => ctx
            .client
            .add_tag(&tag)
            .await
            .context("Failed to add tag")?,
        TagsSubcommand::Rename { old, new } => ctx
            .client
            .rename_tag(&old, &new)
            .await
            .context("Failed to rename tag")?,
    };

    if ctx.json {
        return output::json_pretty(&user.tags);
    }

    output::success("Tags updated");
    output::field("Tags", &user.tags.join(", "));
    Ok(())
}
