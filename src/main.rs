//! xcvr-inventory - optical transceiver inventory report
//!
//! Queries the telemetry store for every device's transceiver history and
//! writes one CSV row per insert/remove event.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use xcvr_inventory::config::{Config, DEFAULT_CSV_FILE, DEFAULT_PORT};
use xcvr_inventory::inventory::DEFAULT_VERSION_CAP;

#[derive(Parser)]
#[command(name = "xcvr-inventory")]
#[command(about = "Report optical transceiver insertions and removals as CSV")]
struct Args {
    /// The server name to connect to
    #[arg(long)]
    servername: String,

    /// The file containing the access token
    #[arg(long)]
    tokenfile: PathBuf,

    /// The file containing the self-signed CA certificate
    #[arg(long)]
    cafile: Option<PathBuf>,

    /// The output file
    #[arg(long, default_value = DEFAULT_CSV_FILE)]
    csvfile: PathBuf,

    /// Port of the telemetry API
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Maximum number of history versions fetched per interface
    #[arg(long, default_value_t = DEFAULT_VERSION_CAP)]
    versions: u32,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            server: args.servername,
            port: args.port,
            token_file: args.tokenfile,
            ca_file: args.cafile,
            csv_file: args.csvfile,
            version_cap: args.versions,
            verbosity: args.verbose,
        }
    }
}

fn main() -> ExitCode {
    let config = Config::from(Args::parse());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.tracing_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match xcvr_inventory::run(&config) {
        Ok(summary) => {
            for warning in &summary.warnings {
                eprintln!(
                    "warning: {} ({}) skipped: {}",
                    warning.serial,
                    warning.hostname.as_deref().unwrap_or("unknown host"),
                    warning.reason
                );
            }
            println!(
                "{} devices, {} rows written to {}",
                summary.devices,
                summary.report.rows,
                summary.report.path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
