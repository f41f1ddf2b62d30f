//! CLI frontend for the PR Nightmare press conference game.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pn",
    about = "PR Nightmare: keep the stock afloat while the press grills you",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the stock price simulation offline
    Simulate {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "60")]
        ticks: usize,

        /// RNG seed for a reproducible run
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Opening price
        #[arg(long, default_value = "100.0")]
        initial_price: f64,

        /// Scale of price noise and trend pull
        #[arg(long, default_value = "10.0")]
        volatility: f64,

        /// Inject a trend, as SCORE@TICK (e.g. -0.8@20). Repeatable.
        #[arg(long = "trend", value_name = "SCORE@TICK")]
        trends: Vec<String>,

        /// Ticks per candle in the table
        #[arg(short, long, default_value = "10")]
        candle: usize,

        /// Write the run as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Seat a crowd and show who raises a hand
    Crowd {
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Number of crowd members
        #[arg(long, default_value = "30")]
        size: usize,

        /// Hands raised per round
        #[arg(long, default_value = "5")]
        hands: usize,

        /// Persona indices that already talked this round (comma separated)
        #[arg(long, value_delimiter = ',')]
        talked: Vec<usize>,
    },

    /// List the reporter personas
    Personas,

    /// Play a press conference in the terminal
    Play {
        /// Use the scripted offline service instead of the OpenAI API
        #[arg(long)]
        offline: bool,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Game length in seconds (30, 60, 90, or 120)
        #[arg(short, long, default_value = "60")]
        duration: u64,

        /// Market tick interval in milliseconds (500-1000)
        #[arg(long, default_value = "1000")]
        tick_ms: u64,

        /// Skip ffmpeg and expect 16 kHz mono WAV answers
        #[arg(long)]
        raw_wav: bool,

        /// Save the transcript as markdown when the game ends
        #[arg(long)]
        transcript: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Simulate {
            ticks,
            seed,
            initial_price,
            volatility,
            trends,
            candle,
            output,
        } => commands::simulate::run(&commands::simulate::SimulateArgs {
            ticks,
            seed,
            initial_price,
            volatility,
            trends,
            candle,
            output,
        }),
        Commands::Crowd {
            seed,
            size,
            hands,
            talked,
        } => commands::crowd::run(seed, size, hands, &talked),
        Commands::Personas => commands::personas::run(),
        Commands::Play {
            offline,
            seed,
            duration,
            tick_ms,
            raw_wav,
            transcript,
        } => commands::play::run(&commands::play::PlayArgs {
            offline,
            seed,
            duration,
            tick_ms,
            raw_wav,
            transcript,
        }),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
