use std::path::PathBuf;

use clap::Parser;

use crate::game::GameConfig;

#[derive(Parser, Debug)]
#[command(name = "snake", version, about = "Snake in the terminal. Arrow keys steer, space quits.")]
pub struct Args {
    /// Starting length of the snake
    #[arg(long, default_value_t = 5)]
    pub length: usize,

    /// Seconds between moves at the start
    #[arg(long, default_value_t = 0.3)]
    pub delay: f64,

    /// Factor applied to the delay after every apple
    #[arg(long, default_value_t = 0.9)]
    pub speedup: f64,

    /// Seed for apple placement, for repeatable games
    #[arg(long)]
    pub seed: Option<u64>,

    /// Grow the snake on every turn, not only when it eats
    #[arg(long)]
    pub grow_on_turn: bool,

    /// Append logs to this file. Without it nothing is logged.
    #[arg(long, env = "SNAKE_LOG")]
    pub log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            snake_length: self.length,
            initial_delay: self.delay,
            speedup: self.speedup,
            grow_on_turn: self.grow_on_turn,
        }
    }
}
