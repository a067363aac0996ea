//! Pocket group subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use budgeit_core::models::NewPocketGroup;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct GroupsCommand {
    #[command(subcommand)]
    pub command: GroupsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum GroupsSubcommand {
    /// List groups and their pockets
    List,

    /// Create a group
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        note: Option<String>,

        /// Pocket ids to move into the group
        #[arg(long = "pocket")]
        pockets: Vec<String>,
    },

    /// Delete a group, keeping its pockets
    Delete {
        /// Group id
        id: String,
    },
}

pub async fn handle(ctx: &AppContext, cmd: GroupsCommand) -> Result<()> {
    ctx.authenticate().await?;

    match cmd.command {
        GroupsSubcommand::List => list(ctx).await,
        GroupsSubcommand::Create {
            name,
            note,
            pockets,
        } => {
            let group = ctx
                .client
                .create_group(&NewPocketGroup {
                    name,
                    note,
                    pockets,
                })
                .await
                .context("Failed to create group")?;

            if ctx.json {
                return output::json_pretty(&group);
            }
            output::success("Group created");
            output::field("Id", &group.id);
            Ok(())
        }
        GroupsSubcommand::Delete { id } => {
            ctx.client
                .delete_group(&id)
                .await
                .context("Failed to delete group")?;
            output::success("Group deleted");
            Ok(())
        }
    }
}

async fn list(ctx: &AppContext) -> Result<()> {
    let groups = ctx
        .client
        .list_groups()
        .await
        .context("Failed to list groups")?;

    if ctx.json {
        return output::json_pretty(&groups);
    }

    for group in &groups {
        println!(
            "{} {}  {}",
            group.name.bold(),
            output::money(group.total()),
            group.id.dimmed()
        );
        for pocket in &group.pockets {
            println!("  {:<22} {:>14}", pocket.name, output::money(pocket.amount));
        }
    }

    Ok(())
}
