mod cmd;
mod output;
mod settings;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use cmd::watch::WatchArgs;
use settings::Settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rdm",
    about = "Status monitor for RDM nodes — port status, time-of-day schedules, and discovery queue",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: nearest rdm.yaml upward from cwd)
    #[arg(long, global = true, env = "RDM_CONFIG")]
    config: Option<PathBuf>,

    /// Node base url, overrides device.url
    #[arg(long, global = true, env = "RDM_DEVICE")]
    device: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one refresh pass and print the three region fragments
    Refresh,

    /// Show port status, queue and schedules as plain tables
    Status,

    /// Refresh repeatedly, writing each region to <out>/<element id>.html
    Watch {
        /// Seconds between passes (default: watch.interval_secs)
        #[arg(long)]
        interval: Option<u64>,

        /// Output directory (default: watch.output_dir)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Run a single pass and exit
        #[arg(long)]
        once: bool,
    },

    /// Serve the status page
    Serve {
        /// Port to listen on (0 = OS-assigned; default: server.port)
        #[arg(long)]
        port: Option<u16>,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },

    /// Inspect and validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } | Commands::Watch { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = Settings::load(cli.config.as_deref(), cli.device.as_deref()).and_then(
        |settings| match cli.command {
            Commands::Refresh => cmd::refresh::run(&settings, cli.json),
            Commands::Status => cmd::status::run(&settings, cli.json),
            Commands::Watch {
                interval,
                out,
                once,
            } => cmd::watch::run(
                &settings,
                WatchArgs {
                    interval,
                    out,
                    once,
                },
            ),
            Commands::Serve { port, no_open } => cmd::serve::run(&settings, port, no_open),
            Commands::Config { subcommand } => cmd::config::run(&settings, subcommand, cli.json),
        },
    );

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
