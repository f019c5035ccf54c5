//! Storystrip CLI binary.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, RunOptions};
use storystrip::StripConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = StripConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            summary,
            summary_file,
            style,
            output,
            auto_accept,
            max_retries,
        } => {
            let options = RunOptions {
                summary: cli::read_summary(summary, summary_file)?,
                style,
                output,
                auto_accept,
                max_retries,
                format: *config.image().output_format(),
            };
            let orchestrator = config.orchestrator()?;
            cli::run_strip(&orchestrator, &options).await?;
        }
        Commands::Script {
            summary,
            summary_file,
            style,
        } => {
            let summary = cli::read_summary(summary, summary_file)?;
            let orchestrator = config.orchestrator()?;
            cli::draft_script(&orchestrator, &summary, &style).await?;
        }
        Commands::Stitch {
            panels,
            output,
            size,
        } => {
            let size = size.unwrap_or(*config.image().size());
            cli::stitch_panels(&panels, &output, size)?;
        }
        Commands::Styles => {
            for style in storystrip::STYLE_MODIFIERS {
                println!("{}", style);
            }
        }
    }

    Ok(())
}
