use std::path::PathBuf;

use anyhow::Result;
use bluesky_client::BlueskyClient;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use skygraph::{build_graph, default_output_path, export, render_summary, ExportFormat};

/// Fetch and analyze the social graph (followers, follows, mutuals) of any
/// Bluesky account.
#[derive(Debug, Parser)]
#[command(name = "skygraph", version)]
struct Args {
    /// Bluesky handle or DID to analyze (e.g. alice.bsky.social)
    #[arg(long)]
    actor: String,

    /// Your Bluesky handle, for authenticated access
    #[arg(long, requires = "password")]
    handle: Option<String>,

    /// Your Bluesky app password (Settings > App Passwords)
    #[arg(long, requires = "handle")]
    password: Option<String>,

    /// Export format
    #[arg(long, value_enum)]
    export: Option<ExportFormat>,

    /// Output file path (default: <actor>_graph.json/csv)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("skygraph=info".parse()?)
                .add_directive("bluesky_client=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut client = BlueskyClient::new();
    if let (Some(handle), Some(password)) = (&args.handle, &args.password) {
        // A rejected login aborts before any graph request is made.
        client.login(handle, password).await?;
    }

    let graph = build_graph(&client, &args.actor).await?;
    print!("{}", render_summary(&graph));

    if let Some(format) = args.export {
        let path = args
            .output
            .unwrap_or_else(|| PathBuf::from(default_output_path(&args.actor, format)));
        export(&graph, format, &path)?;
    }

    Ok(())
}
