use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use comic_blurb::api::create_router;
use comic_blurb::config::Config;
use comic_blurb::data_models::ComicRequest;
use comic_blurb::describer::Describer;

#[derive(Parser)]
#[command(name = "comic-blurb", about = "Generate short marketing descriptions for comics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the describe endpoint over HTTP
    Serve {
        #[arg(long, default_value = "0.0.0.0:3000")]
        addr: SocketAddr,
    },
    /// Run a single request and print the envelope
    Describe {
        #[arg(long)]
        title: String,
        #[arg(long)]
        status: String,
        #[arg(long)]
        rating: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (also picks up log crate records)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let describer = Arc::new(Describer::from_config(&config));

    match cli.command.unwrap_or(Command::Serve {
        addr: ([0, 0, 0, 0], 3000).into(),
    }) {
        Command::Serve { addr } => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(
                "listening on {addr} (model: {}, search: {})",
                describer.model(),
                describer.search_enabled()
            );
            axum::serve(listener, create_router(describer)).await?;
        }
        Command::Describe {
            title,
            status,
            rating,
        } => {
            let body = serde_json::to_string(&ComicRequest {
                title: Some(title),
                status: Some(status),
                rating,
            })?;
            let response = describer.describe(&body).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}
