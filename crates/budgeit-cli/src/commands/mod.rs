//! Subcommand implementations.

pub mod groups;
pub mod login;
pub mod pockets;
pub mod tags;
pub mod transactions;

mod logout;
mod whoami;

use anyhow::Result;

use crate::cli::{Cli, Commands};
use crate::context::AppContext;

pub async fn handle(cli: Cli) -> Result<()> {
    let ctx = AppContext::new(&cli)?;

    match cli.command {
        Commands::Login(args) => login::run(&ctx, args).await,
        Commands::Logout => logout::run(&ctx).await,
        Commands::Whoami => whoami::run(&ctx).await,
        Commands::Pockets(cmd) => pockets::handle(&ctx, cmd).await,
        Commands::Groups(cmd) => groups::handle(&ctx, cmd).await,
        Commands::Transactions(cmd) => transactions::handle(&ctx, cmd).await,
        Commands::Tags(cmd) => tags::handle(&ctx, cmd).await,
    }
}
