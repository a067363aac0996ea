//! Whoami command implementation.

use anyhow::Result;

use crate::context::AppContext;
use crate::output;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let user = ctx.authenticate().await?;

    if ctx.json {
        return output::json_pretty(&user);
    }

    output::field("Name", &user.full_name());
    output::field("Email", &user.email);
    output::field("Server", &ctx.server);
    output::field("Unallocated", &output::money(user.unallocated));
    output::field("Pockets", &user.pockets.len().to_string());
    if !user.tags.is_empty() {
        output::field("Tags", &user.tags.join(", "));
    }

    Ok(())
}
