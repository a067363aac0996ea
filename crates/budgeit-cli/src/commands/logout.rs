//! Logout command implementation.

use anyhow::{Context, Result};

use budgeit_core::SecureStore;
use budgeit_core::traits::USER_CREDENTIALS_KEY;

use crate::context::AppContext;
use crate::output;

pub async fn run(ctx: &AppContext) -> Result<()> {
    ctx.client.logout();
    ctx.store
        .delete(USER_CREDENTIALS_KEY)
        .context("Failed to forget credentials")?;

    output::success("Logged out");
    Ok(())
}
