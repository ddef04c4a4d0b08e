use clap::Parser;
use tracing_subscriber::EnvFilter;

use wordspy::{WordspyError, WordspyServer};

#[derive(Parser, Debug)]
#[command(name = "wordspy", about = "Real-time word-association game server")]
struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Bind on all interfaces instead of localhost only.
    #[arg(long)]
    all: bool,

    /// Directory containing the word-list files.
    #[arg(long, default_value = "server")]
    words_dir: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), WordspyError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let host = if args.all { "0.0.0.0" } else { "127.0.0.1" };
    let addr = format!("{host}:{}", args.port);

    let server = WordspyServer::builder()
        .bind(&addr)
        .words_dir(args.words_dir)
        .build()
        .await?;

    tracing::info!(%addr, "listening");
    server.run().await
}
