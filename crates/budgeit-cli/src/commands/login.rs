//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use budgeit_core::traits::USER_CREDENTIALS_KEY;
use budgeit_core::{Credentials, SecureStore};

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Remember the credentials so later commands can log in again
    #[arg(long)]
    pub remember: bool,
}

pub async fn run(ctx: &AppContext, args: LoginArgs) -> Result<()> {
    let credentials = Credentials::new(&args.email, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let user = ctx
        .client
        .login(&credentials)
        .await
        .context("Failed to login")?;

    if args.remember {
        ctx.store
            .set(USER_CREDENTIALS_KEY, &credentials)
            .context("Failed to remember credentials")?;
    }

    if ctx.json {
        return output::json_pretty(&user);
    }

    output::success("Logged in successfully");
    println!();
    output::field("Name", &user.full_name());
    output::field("Email", &user.email);
    if args.remember {
        output::field("Credentials", &ctx.store.dir().display().to_string());
    }

    Ok(())
}
