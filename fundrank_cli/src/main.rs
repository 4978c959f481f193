mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "fundrank")]
#[command(about = "Rank open-end funds by trailing returns and serve the report")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the ranking workbook for every category
    Rank(commands::rank::RankArgs),
    /// Rank one category in the terminal without writing a workbook
    Preview(commands::preview::PreviewArgs),
    /// Serve pages of a ranking workbook over HTTP
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fundrank=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output);

    match &cli.command {
        Commands::Rank(args) => commands::rank::run(args, &format).await?,
        Commands::Preview(args) => commands::preview::run(args, &format).await?,
        Commands::Serve(args) => commands::serve::run(args).await?,
    }

    Ok(())
}
