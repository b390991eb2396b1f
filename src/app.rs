use std::{thread::sleep, time::Duration};

use rand::Rng;
use tracing::info;

use crate::display::Screen;
use crate::error::TermError;
use crate::game::{GameState, SnakeGame, TickResult};
use crate::input::{Key, KeySource};

pub trait Clock {
    fn sleep(&mut self, delay: Duration);
}

/// Blocks the current thread for the whole delay.
pub struct ThreadClock;

impl Clock for ThreadClock {
    fn sleep(&mut self, delay: Duration) {
        sleep(delay);
    }
}

/// How a run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub score: u32,
    pub length: usize,
    pub ticks: u64,
    pub lost: bool,
}

/// Drives `game` until the quit key is pressed.
///
/// Every iteration refreshes the screen, waits for the current delay, reads at
/// most one key and, while the game is still running, applies it and ticks.
/// After a loss the board stays up with the banner until quit.
pub fn run<R, S, K, C>(game: &mut SnakeGame<R>, screen: &mut S, keys: &mut K, clock: &mut C)
    -> Result<Summary, TermError>
where
    R: Rng,
    S: Screen + ?Sized,
    K: KeySource + ?Sized,
    C: Clock + ?Sized,
{
    let mut ticks = 0;

    info!(size = ?game.size(), head = ?game.head(), apple = ?game.apple(), direction = ?game.direction(), "run started");
    game.draw(screen);

    loop {
        screen.refresh()?;
        clock.sleep(Duration::from_secs_f64(game.get_delay()));

        let key = keys.poll_key()?;
        if key == Some(Key::Quit) {
            info!(score = game.score(), ticks, "quit");
            break;
        }

        if game.state() == GameState::Lost {
            continue;
        }

        if let Some(direction) = key.and_then(Key::direction) {
            game.change_direction(direction);
        }

        ticks += 1;
        if game.tick(screen) == TickResult::Lost {
            screen.lost_message();
        }
    }

    let lost = game.state() == GameState::Lost;
    Ok(Summary { score: game.score(), length: game.body().len(), ticks, lost })
}
