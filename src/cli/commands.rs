use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "notebox")]
#[command(version, about = "Personal notes, one short address each")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (TOML). Defaults to $NOTEBOX_CONFIG if set
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SQLite database file, overriding the config
    #[arg(long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the web server
    Serve {
        /// Address to listen on, overriding the config (e.g. 127.0.0.1:8000)
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
    },

    /// Manage user accounts
    User(UserCommand),
}

#[derive(Args, Debug)]
pub struct UserCommand {
    #[command(subcommand)]
    pub action: UserAction,
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// Create a user account
    Add {
        /// Login name
        username: String,

        /// Password for the new account
        #[arg(long)]
        password: String,
    },

    /// List user accounts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
