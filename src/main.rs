use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use plarix::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    init_tracing();

    // Dispatch to appropriate command handler
    match args.get_command() {
        cli::Commands::Check(check) => {
            commands::check::execute(check).await?;
        }
        cli::Commands::Render(render) => {
            commands::render::execute(render)?;
        }
        cli::Commands::Pricing(pricing) => {
            commands::pricing::execute(pricing)?;
        }
    }

    Ok(())
}
