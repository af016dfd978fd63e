//! gn950: power, brightness and ambient lighting control for LG 27GN950
//! monitors over USB HID.

use std::path::PathBuf;

use clap::Parser;

mod cli;

#[derive(Parser)]
#[command(
    name = "gn950",
    version,
    about = "Power, brightness and ambient lighting control for LG 27GN950 monitors"
)]
struct Args {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read settings from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Monitors to control: "all" or 1-based numbers, e.g. "1,3"
    #[arg(short, long, global = true, value_name = "LIST")]
    monitors: Option<String>,

    #[command(subcommand)]
    command: cli::Command,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let globals = cli::Globals {
        json: args.json,
        config: args.config,
        monitors: args.monitors,
    };

    if let Err(e) = cli::run(args.command, &globals) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
