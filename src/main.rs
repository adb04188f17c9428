use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feedboard::app::AppContext;
use feedboard::cli::commands::{self, ArticleQuery};
use feedboard::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for listings and --json
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Articles {
            theme,
            sites,
            authors,
            limit,
            json,
        } => {
            let query = ArticleQuery {
                theme,
                sites,
                authors,
                limit,
            };
            commands::list_articles(&ctx, &query, json).await?;
        }
        Commands::Stats { theme, by } => {
            commands::show_stats(&ctx, theme.as_deref(), by.into()).await?;
        }
        Commands::Feeds => {
            commands::list_feeds(&ctx)?;
        }
        Commands::Tui => {
            feedboard::tui::run(Arc::new(ctx)).await?;
        }
        Commands::Watch {
            interval,
            no_initial_run,
        } => {
            commands::watch(Arc::new(ctx), interval.as_deref(), !no_initial_run).await?;
        }
    }

    Ok(())
}
