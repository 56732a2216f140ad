use std::path::PathBuf;

use anyhow::{Context, Result};
use argh::FromArgs;
use chrono::Utc;
use tempboard::config::AppConfig;
use tempboard::models::location;
use tempboard::web::{self, AppState};
use tempboard::{TempBoardError, VERSION, logging};
use tracing::info;

/// Airport temperature dashboard
#[derive(FromArgs, Debug)]
struct Args {
    /// path to the configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Command {
    Serve(ServeArgs),
    Show(ShowArgs),
}

/// Run the web dashboard
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "serve")]
struct ServeArgs {
    /// port to listen on (overrides server.port)
    #[argh(option, short = 'p')]
    port: Option<u16>,
}

/// Print today's timeline for one location
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "show")]
struct ShowArgs {
    /// station code, e.g. KAUS
    #[argh(positional)]
    code: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Args = argh::from_env();

    let mut config = AppConfig::load_from_path(args.config)?;
    logging::init(&config.logging);
    info!("tempboard {}", VERSION);

    match args.command {
        Command::Serve(serve) => {
            if let Some(port) = serve.port {
                config.server.port = port;
            }
            web::run(&config).await
        }
        Command::Show(show) => {
            let location = location::find(&show.code).ok_or_else(|| {
                TempBoardError::validation(format!("Unknown location '{}'", show.code))
            })?;
            let state = AppState::from_config(&config)?;
            let report = state
                .dashboard
                .load(location, Utc::now())
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))
                .with_context(|| format!("Failed to load {}", location.code))?;
            print!("{report}");
            Ok(())
        }
    }
}
