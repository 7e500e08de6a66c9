use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planet_api::api;
use planet_api::config::{Config, DatabaseLocation};

#[derive(Parser)]
#[command(name = "planet-api")]
#[command(about = "REST service for cataloguing planets by climate and terrain")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port for the HTTP API
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the SQLite database file
        #[arg(short, long, conflicts_with = "memory")]
        database: Option<PathBuf>,

        /// Keep planets in memory only
        #[arg(long)]
        memory: bool,
    },
    /// Apply pending schema migrations and exit
    Migrate {
        /// Path to the SQLite database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "planet_api=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting planet-api with database {:?}", config.database);

    let db = config.open_database()?;
    let app = api::create_router(db);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("planet-api listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env()?;

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            database,
            memory,
        }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(path) = database {
                config.database = DatabaseLocation::Path(path);
            }
            if memory {
                config.database = DatabaseLocation::Memory;
            }
            serve(config).await?;
        }
        Some(Commands::Migrate { database }) => {
            if let Some(path) = database {
                config.database = DatabaseLocation::Path(path);
            }
            config.open_database()?;
            tracing::info!("Migrations up to date");
        }
        None => serve(config).await?,
    }

    Ok(())
}
