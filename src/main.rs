//! Interactive checkers game for two players sharing the terminal.

use std::io;
use std::path::PathBuf;

use bitcheckers::checkers::persistence::{self, LoadMode};
use bitcheckers::checkers::position::Position;
use bitcheckers::{Session, SessionConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Plays checkers in the terminal. Logs are written to stderr and controlled
/// by the `RUST_LOG` environment variable.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Accept saved games describing positions that can not be reached in a
    /// game (e.g. overlapping pieces).
    #[arg(long)]
    permissive_load: bool,
    /// Resume the game saved in this file.
    #[arg(long, value_name = "FILE")]
    load: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    bitcheckers::print_engine_info();
    bitcheckers::print_binary_info();

    let mut config = SessionConfig::DEFAULT;
    if args.permissive_load {
        config.load_mode = LoadMode::Permissive;
    }
    let position = match &args.load {
        Some(path) => persistence::load(path, config.load_mode)?,
        None => Position::starting(),
    };
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    Session::with_position(position, config, &mut input, &mut output).run()
}
