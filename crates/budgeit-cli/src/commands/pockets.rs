//! Pocket subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use budgeit_core::models::{NewPocket, PocketUpdate};

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct PocketsCommand {
    #[command(subcommand)]
    pub command: PocketsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PocketsSubcommand {
    /// List pockets
    List,

    /// Create a pocket
    Create(CreateArgs),

    /// Rename a pocket
    Rename {
        /// Pocket id
        id: String,
        /// New name
        name: String,
    },

    /// Delete a pocket
    Delete {
        /// Pocket id
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,

    /// Starting balance
    #[arg(long, default_value_t = 0.0)]
    pub amount: f64,

    #[arg(long)]
    pub note: Option<String>,

    /// Group to place the pocket in
    #[arg(long)]
    pub group: Option<String>,
}

pub async fn handle(ctx: &AppContext, cmd: PocketsCommand) -> Result<()> {
    ctx.authenticate().await?;

    match cmd.command {
        PocketsSubcommand::List => list(ctx).await,
        PocketsSubcommand::Create(args) => create(ctx, args).await,
        PocketsSubcommand::Rename { id, name } => rename(ctx, &id, name).await,
        PocketsSubcommand::Delete { id } => delete(ctx, &id).await,
    }
}

async fn list(ctx: &AppContext) -> Result<()> {
    let pockets = ctx
        .client
        .list_pockets()
        .await
        .context("Failed to list pockets")?;

    if ctx.json {
        return output::json_pretty(&pockets);
    }

    if pockets.is_empty() {
        eprintln!("{}", "No pockets".dimmed());
    }
    for pocket in &pockets {
        println!(
            "{:<24} {:>14}  {}",
            pocket.name,
            output::money(pocket.amount),
            pocket.id.dimmed()
        );
    }

    Ok(())
}

async fn create(ctx: &AppContext, args: CreateArgs) -> Result<()> {
    let pocket = ctx
        .client
        .create_pocket(&NewPocket {
            name: args.name,
            amount: args.amount,
            note: args.note,
            group_id: args.group,
        })
        .await
        .context("Failed to create pocket")?;

    if ctx.json {
        return output::json_pretty(&pocket);
    }

    output::success("Pocket created");
    output::field("Id", &pocket.id);
    output::field("Name", &pocket.name);
    output::field("Amount", &output::money(pocket.amount));
    Ok(())
}

async fn rename(ctx: &AppContext, id: &str, name: String) -> Result<()> {
    let pockets = ctx
        .client
        .list_pockets()
        .await
        .context("Failed to list pockets")?;

    let current = pockets
        .iter()
        .find(|p| p.id == id)
        .with_context(|| format!("No pocket with id {}", id))?;

    let update = PocketUpdate {
        name,
        ..PocketUpdate::from(current)
    };

    let pocket = ctx
        .client
        .update_pocket(id, &update)
        .await
        .context("Failed to rename pocket")?;

    output::success(&format!("Pocket renamed to {}", pocket.name));
    Ok(())
}

async fn delete(ctx: &AppContext, id: &str) -> Result<()> {
    ctx.client
        .delete_pocket(id)
        .await
        .context("Failed to delete pocket")?;

    output::success("Pocket deleted");
    Ok(())
}
