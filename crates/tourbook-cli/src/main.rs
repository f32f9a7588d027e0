//! tourbook - browse and book tours from the terminal.
//!
//! Reads go to the backend first and fall back to the on-device cache when
//! it cannot be reached, so `tourbook tours` keeps working offline.

mod app;
mod notifier;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tourbook_core::{Config, Notifier};

use app::App;

// ============================================================================
// Constants
// ============================================================================

/// Set to `1` to also write logs to a daily file under the data directory
const ENV_LOG_FILE: &str = "TOURBOOK_LOG_FILE";

const LOG_FILE_PREFIX: &str = "tourbook.log";

const USAGE: &str = "\
Usage: tourbook <command> [args]

Commands:
  tours                     List all tours (offline cache if the backend is down)
  tour <id>                 Show one tour
  search <text>             Search cached tours by name or destination
  cache-info                Show how many tours are cached and how old they are
  clear-cache               Delete every cached tour
  promotions                List promotions and their status
  departures <tour-id>      List upcoming departures of a tour
  book <departure-id> <n>   Book n places on a departure
  bookings                  List your bookings
  cancel <booking-id>       Cancel a booking
  login [--remember]        Log in
  logout                    Log out and forget the saved email
  whoami                    Show the logged-in user";

// ============================================================================
// Commands
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tours,
    Tour(i64),
    Search(String),
    CacheInfo,
    ClearCache,
    Promotions,
    Departures(i64),
    Book { departure_id: i64, quantity: u32 },
    Bookings,
    Cancel(i64),
    Login { remember: bool },
    Logout,
    WhoAmI,
    Help,
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let Some(name) = args.first() else {
            return Ok(Command::Help);
        };
        let rest = &args[1..];

        let command = match name.as_str() {
            "tours" => Command::Tours,
            "tour" => Command::Tour(parse_id(rest.first(), "tour id")?),
            // Multi-word queries don't need quoting
            "search" => Command::Search(rest.join(" ")),
            "cache-info" => Command::CacheInfo,
            "clear-cache" => Command::ClearCache,
            "promotions" => Command::Promotions,
            "departures" => Command::Departures(parse_id(rest.first(), "tour id")?),
            "book" => {
                let departure_id = parse_id(rest.first(), "departure id")?;
                let quantity: u32 = rest
                    .get(1)
                    .map(|q| q.parse())
                    .transpose()
                    .context("quantity must be a positive number")?
                    .unwrap_or(1);
                if quantity == 0 {
                    bail!("quantity must be at least 1");
                }
                Command::Book {
                    departure_id,
                    quantity,
                }
            }
            "bookings" => Command::Bookings,
            "cancel" => Command::Cancel(parse_id(rest.first(), "booking id")?),
            "login" => Command::Login {
                remember: rest.iter().any(|a| a == "--remember"),
            },
            "logout" => Command::Logout,
            "whoami" => Command::WhoAmI,
            "help" | "-h" | "--help" => Command::Help,
            other => bail!("unknown command '{}'\n\n{}", other, USAGE),
        };
        Ok(command)
    }
}

fn parse_id(arg: Option<&String>, what: &str) -> Result<i64> {
    let raw = arg.with_context(|| format!("missing {}", what))?;
    raw.parse()
        .with_context(|| format!("{} must be a number, got '{}'", what, raw))
}

// ============================================================================
// Startup
// ============================================================================

/// Initialize the tracing subscriber for logging.
///
/// The returned guard flushes the file writer and must outlive `main`'s work.
fn init_tracing(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer().with_writer(io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(filter)
                .init();
            None
        }
    }
}

fn log_dir(config: &Config) -> Option<PathBuf> {
    let enabled = std::env::var(ENV_LOG_FILE)
        .map(|v| v == "1")
        .unwrap_or(false);
    if !enabled {
        return None;
    }
    config.data_dir().map(|dir| dir.join("logs"))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;
    let _log_guard = init_tracing(log_dir(&config));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(ExitCode::SUCCESS);
    }

    info!(?command, api = %config.api_base_url, "tourbook starting");

    let mut app = App::new(config)?;
    let result = app.run(command).await;
    app.shutdown().await;

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            app.notifier().error(&format!("{:#}", e));
            Ok(ExitCode::FAILURE)
        }
    }
}
