mod extract;
mod find;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefinder-cli")]
#[command(about = "Store finder command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one store search on the browser agent and print the stores as JSON
    Find(find::FindArgs),
    /// Extract store records from a saved agent answer
    Extract {
        /// File holding the agent's answer (reads stdin when omitted)
        #[arg(long)]
        file: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // stdout carries JSON output; logs go to stderr.
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Find(args) => {
            let config = storefinder_core::load_app_config()?;
            find::run_find(&config, args).await?;
        }
        Commands::Extract { file } => extract::run_extract(file.as_deref())?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
