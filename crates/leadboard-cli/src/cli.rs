use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "leadboard")]
#[command(about = "Staff console for the lead pipeline", long_about = None)]
#[command(version, arg_required_else_help = true)]
pub struct Cli {
    /// Base URL of the console API (or set LEADBOARD_API_URL)
    #[arg(long, env = "LEADBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for the API (or set LEADBOARD_TOKEN)
    #[arg(long, env = "LEADBOARD_TOKEN")]
    pub token: Option<String>,

    /// Run against a seeded in-memory store instead of the API
    #[arg(long)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and print the board, grouped by status column
    Board,
    /// Lead operations
    Lead(LeadCommand),
    /// Print the navigation badge counters once
    Counters,
    /// Keep the board and counters in sync until interrupted
    Watch,
}

#[derive(Args)]
pub struct LeadCommand {
    #[command(subcommand)]
    pub action: LeadAction,
}

#[derive(Subcommand)]
pub enum LeadAction {
    /// Move a lead to a new pipeline status
    Move {
        id: i64,
        /// One of: new, contacted, qualified, won, lost
        status: String,
    },
}
