use clap::{Parser, Subcommand};
use delicious_core::config::Config;
use delicious_server::AppState;

#[derive(Parser)]
#[command(name = "delicious", about = "Store directory with typeahead search")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve {
        /// Port to listen on, overriding `[server] port`.
        #[arg(long)]
        port: Option<u16>,
        /// Load a small demo data set before serving.
        #[arg(long)]
        seed: bool,
    },
    /// Open the terminal typeahead.
    Search {
        /// Server base URL, overriding `[typeahead] server_url`.
        #[arg(long)]
        server: Option<String>,
        /// Write debug logs to /tmp/delicious-debug.log (tail -f to inspect).
        #[arg(long)]
        debug: bool,
    },
}

fn env_filter(default: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, seed } => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter("info,tower_http=debug"))
                .init();

            let mut config = Config::load()?;
            if let Some(port) = port {
                config.server.port = port;
            }

            let state = AppState::in_memory(config);
            if seed {
                delicious_server::seed::seed(&state).await?;
            }
            delicious_server::serve(state).await
        }
        Command::Search { server, debug } => {
            // stdout belongs to the terminal UI, so logs only go to a file.
            if debug {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open("/tmp/delicious-debug.log")?;
                tracing_subscriber::fmt()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false)
                    .with_env_filter(env_filter("debug"))
                    .init();
                tracing::info!("delicious debug log started, tail -f /tmp/delicious-debug.log");
            }

            let mut config = Config::load().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "could not load config, using defaults");
                Config::defaults()
            });
            if let Some(server) = server {
                config.typeahead.server_url = server;
            }
            delicious_typeahead::run(config.typeahead).await
        }
    }
}
