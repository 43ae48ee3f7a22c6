mod compare;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "devduel")]
#[command(about = "Compare two GitHub profiles head to head")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one comparison and print the result.
    Compare(compare::CompareArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Compare(args) => compare::run(args).await,
    }
}
