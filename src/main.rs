mod app;
mod config;
mod display;
mod error;
mod game;
mod input;
mod snake;
mod telemetry;
mod term;

use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info};

use crate::app::{Summary, ThreadClock};
use crate::config::Args;
use crate::display::Screen;
use crate::game::SnakeGame;
use crate::term::{TermKeys, TermManager};

pub type Coord = i32;
pub type Coords = (Coord, Coord);

fn main() -> ExitCode {
    let args = Args::parse();
    let _telemetry = telemetry::init_tracing(args.log_file.as_deref(), &args.log_level);

    match play(&args) {
        Ok(summary) => {
            info!(?summary, "game over");
            println!("Score: {}", summary.score);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "snake failed");
            eprintln!("snake: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn play(args: &Args) -> Result<Summary, error::Error> {
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut term = TermManager::new()?;
    let mut game = SnakeGame::new(term.get_size(), args.game_config(), rng)?;

    term.setup()?;
    // The terminal comes back even when the loop fails
    let result = app::run(&mut game, &mut term, &mut TermKeys, &mut ThreadClock);
    let restored = term.restore();

    let summary = result?;
    restored?;
    Ok(summary)
}
