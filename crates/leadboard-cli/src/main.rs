mod cli;
mod context;
mod handlers;
mod output;

use clap::Parser;

use cli::{Cli, Commands, LeadAction};
use context::{demo_context, rest_context, Context};
use leadboard_core::{AppConfig, AuthToken};
use leadboard_store::{CounterSource, LeadStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("LEADBOARD_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }

    let result = if cli.demo {
        dispatch(cli.command, demo_context(config)).await
    } else {
        let token = cli.token.map(AuthToken::new);
        dispatch(cli.command, rest_context(config, token)).await
    };

    if let Err(err) = result {
        output::output_error(&format!("{err:#}"));
    }
    Ok(())
}

async fn dispatch<S, C>(command: Commands, ctx: Context<S, C>) -> anyhow::Result<()>
where
    S: LeadStore + 'static,
    C: CounterSource + 'static,
{
    match command {
        Commands::Board => handlers::show_board(ctx.leads, &ctx.config).await,
        Commands::Lead(lead_cmd) => match lead_cmd.action {
            LeadAction::Move { id, status } => handlers::move_lead(ctx.leads, id, &status).await,
        },
        Commands::Counters => handlers::show_counters(&ctx.counters).await,
        Commands::Watch => handlers::watch(ctx.leads, ctx.counters, &ctx.config).await,
    }
}
