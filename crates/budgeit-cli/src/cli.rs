//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{groups, login, pockets, tags, transactions};

/// budge-it CLI for exploring pockets, groups and transactions.
#[derive(Parser, Debug)]
#[command(name = "budgeit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base URL
    #[arg(
        long,
        env = "BUDGEIT_API_URL",
        default_value = "https://api.budgeit.app",
        global = true
    )]
    pub api_url: String,

    /// API key sent with every request
    #[arg(long, env = "BUDGEIT_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Directory for the encrypted credential store
    #[arg(long, env = "BUDGEIT_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with email and password
    Login(login::LoginArgs),

    /// Forget remembered credentials
    Logout,

    /// Display the logged-in user
    Whoami,

    /// Pocket operations
    Pockets(pockets::PocketsCommand),

    /// Pocket group operations
    Groups(groups::GroupsCommand),

    /// Transaction operations
    Transactions(transactions::TransactionsCommand),

    /// Tag operations
    Tags(tags::TagsCommand),
}
