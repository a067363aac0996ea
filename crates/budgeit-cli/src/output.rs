//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use budgeit_core::models::format_currency;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Format an amount as currency, red when negative.
pub fn money(amount: f64) -> String {
    let text = format_currency(amount);
    if amount < 0.0 {
        text.red().to_string()
    } else {
        text
    }
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
