//! CLI for rangerng: bounded random integers from the entropy source you pick.

mod commands;

use clap::{Parser, Subcommand};
use rangerng_core::BackendId;

#[derive(Parser)]
#[command(name = "rangerng")]
#[command(about = "rangerng: uniform integers from the OS pool, CryptoAPI, or RDRAND")]
#[command(version = rangerng_core::VERSION)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every backend and whether it can run on this machine
    Scan {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Draw integers in [min, max] from one backend
    Generate {
        /// Backend: os_pool, crypto_api, hardware
        #[arg(long, short, default_value = "os_pool")]
        backend: BackendId,

        /// Inclusive lower bound
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        min: i64,

        /// Inclusive upper bound
        #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
        max: i64,

        /// Number of values to draw
        #[arg(long, short = 'n', default_value_t = 1)]
        count: usize,

        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Describe one backend and time a single raw draw
    Probe {
        /// Backend: os_pool, crypto_api, hardware
        backend: BackendId,
    },

    /// Start the HTTP server
    Server {
        /// Port to listen on
        #[arg(long, default_value = "8043")]
        port: u16,

        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

fn main() {
    let cli = Cli::parse();
    commands::init_logging(cli.verbose);

    match cli.command {
        Commands::Scan { json } => commands::scan::run(json),
        Commands::Generate {
            backend,
            min,
            max,
            count,
            json,
        } => commands::generate::run(commands::generate::GenerateCommandConfig {
            backend,
            min,
            max,
            count,
            json,
        }),
        Commands::Probe { backend } => commands::probe::run(backend),
        Commands::Server { port, host } => commands::server::run(&host, port),
    }
}
