use clap::Parser;
use tokio::net::TcpListener;

use signalrelay::config::Config;
use signalrelay::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "signalrelay")]
#[command(about = "Event-stream signaling relay for browser peers")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides PORT)
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signalrelay=debug,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env().with_port_override(args.port);
    print_banner(&config);

    let state = AppState::new(&config);
    let app = signalrelay::routes::router(state);

    let listener = TcpListener::bind((config.bind.as_str(), config.port))
        .await
        .expect("failed to bind");

    let local = listener.local_addr().expect("failed to get local address");
    tracing::info!("Server started on port {} at {}", local.port(), local.ip());
    eprintln!("  \x1b[32m→ listening on {local}\x1b[0m");
    eprintln!();

    axum::serve(listener, app).await.expect("server error");
}

fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");
    let eviction = if config.evict_empty_sessions {
        "evict empty"
    } else {
        "retain empty"
    };

    eprintln!();
    eprintln!("  \x1b[1;36msignalrelay\x1b[0m \x1b[2mv{version}\x1b[0m");
    eprintln!();
    eprintln!("  \x1b[2mport\x1b[0m         {}", config.port);
    eprintln!("  \x1b[2mcapacity\x1b[0m     {}", config.room_capacity);
    eprintln!("  \x1b[2mheartbeat\x1b[0m    {}s", config.heartbeat_interval_secs);
    eprintln!("  \x1b[2msessions\x1b[0m     {eviction}");
    eprintln!();
}
