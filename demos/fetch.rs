//! Download one URL over parallel range requests.
//!
//! ```text
//! cargo run --example fetch -- --url https://example.com/file.iso -c 8 -t -d downloads
//! ```
//!
//! Set `RUST_LOG=splitfetch=debug` to follow the transfer phases.

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use splitfetch::downloader::default_workers;
use splitfetch::{Download, DownloaderBuilder};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Download a file over parallel byte-range connections")]
struct Args {
    /// URL of the file to download.
    #[arg(long)]
    url: Option<String>,

    /// Number of parallel connections.
    #[arg(short = 'c', long, default_value_t = default_workers())]
    connections: usize,

    /// Prefix the output file name with a timestamp.
    #[arg(short = 't', long)]
    timestamp: bool,

    /// Directory to save the file into.
    #[arg(short = 'd', long, default_value = ".")]
    directory: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("splitfetch=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let url = args
        .url
        .ok_or_else(|| eyre!("no URL given, run with --help for the available options"))?;

    let download = Download::try_from(url.as_str())?;
    let downloader = DownloaderBuilder::new()
        .directory(args.directory)
        .workers(args.connections)
        .timestamped(args.timestamp)
        .build();

    let summary = downloader.download(&download).await?;
    println!("Size: {} bytes", summary.size());
    println!("Elapsed time: {:?}", summary.elapsed());
    println!("Saved to {}", summary.path().display());

    Ok(())
}
