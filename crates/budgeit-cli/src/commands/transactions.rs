//! Transaction subcommands.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use colored::Colorize;

use budgeit_core::models::NewTransaction;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct TransactionsCommand {
    #[command(subcommand)]
    pub command: TransactionsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TransactionsSubcommand {
    /// List transactions
    List,

    /// Record a transaction
    Add(AddArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub amount: f64,

    /// Where the money goes
    #[arg(long)]
    pub inflow: String,

    /// Where the money comes from
    #[arg(long)]
    pub outflow: String,

    /// RFC 3339 timestamp; defaults to now
    #[arg(long)]
    pub date: Option<DateTime<Utc>>,

    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[arg(long)]
    pub note: Option<String>,
}

pub async fn handle(ctx: &AppContext, cmd: TransactionsCommand) -> Result<()> {
    ctx.authenticate().await?;

    match cmd.command {
        TransactionsSubcommand::List => list(ctx).await,
        TransactionsSubcommand::Add(args) => add(ctx, args).await,
    }
}

async fn list(ctx: &AppContext) -> Result<()> {
    let transactions = ctx
        .client
        .list_transactions()
        .await
        .context("Failed to list transactions")?;

    if ctx.json {
        return output::json_pretty(&transactions);
    }

    for t in &transactions {
        println!(
            "{}  {:<24} {:>14}  {} -> {}",
            t.date.format("%Y-%m-%d").to_string().dimmed(),
            t.name,
            output::money(t.amount),
            t.outflow,
            t.inflow
        );
    }

    Ok(())
}

async fn add(ctx: &AppContext, args: AddArgs) -> Result<()> {
    let transaction = NewTransaction {
        name: args.name,
        amount: args.amount,
        date: args.date.unwrap_or_else(Utc::now),
        inflow: args.inflow,
        outflow: args.outflow,
        tags: (!args.tags.is_empty()).then_some(args.tags),
        note: args.note,
    };

    let created = ctx
        .client
        .add_transaction(&transaction)
        .await
        .context("Failed to add transaction")?;

    if ctx.json {
        return output::json_pretty(&created);
    }

    output::success("Transaction recorded");
    output::field("Id", &created.id);
    output::field("Amount", &output::money(created.amount));
    Ok(())
}
