use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "emoblob-server", about = "Persists edited emotion presets to a JSON dataset")]
struct Args {
    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Preset dataset the endpoint merges into. Must already exist.
    #[arg(long, default_value = "emotions_dataset.json")]
    dataset: PathBuf,

    /// Directory served for every other path.
    #[arg(long, default_value = ".")]
    static_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emoblob_server=info,emoblob=info".into()),
        )
        .init();

    let args = Args::parse();
    let app = emoblob::server::router(args.dataset.clone(), args.static_dir);

    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(dataset = %args.dataset.display(), "Server running on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
