use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::{Coord, Coords};
use crate::display::Screen;
use crate::error::GameError;
use crate::snake::{Snake, Direction};

const INITIAL_SNAKE_LENGTH: usize = 5;
const INITIAL_DELAY_SECS: f64 = 0.3;
const SPEEDUP_PER_APPLE: f64 = 0.9;
const MAX_DELAY_SECS: f64 = 60.0;

// Random apple draws per interior cell before falling back to a full scan
const APPLE_ATTEMPTS_PER_CELL: usize = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub snake_length: usize,
    /// Seconds between ticks at the start of a run
    pub initial_delay: f64,
    /// Factor the delay is multiplied by on every apple
    pub speedup: f64,
    /// Every direction change also grows the snake by one segment
    pub grow_on_turn: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            snake_length: INITIAL_SNAKE_LENGTH,
            initial_delay: INITIAL_DELAY_SECS,
            speedup: SPEEDUP_PER_APPLE,
            grow_on_turn: false,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.snake_length == 0 {
            return Err(GameError::InvalidConfig("snake length must be at least 1".into()));
        }
        if !(self.initial_delay > 0.0 && self.initial_delay <= MAX_DELAY_SECS) {
            return Err(GameError::InvalidConfig(format!(
                "delay must be in (0, {}] seconds, got {}",
                MAX_DELAY_SECS, self.initial_delay
            )));
        }
        if !(self.speedup > 0.0 && self.speedup <= 1.0) {
            return Err(GameError::InvalidConfig(format!(
                "speedup must be in (0, 1], got {}",
                self.speedup
            )));
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Running,
    Lost,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickResult {
    Continue,
    Lost,
}

pub struct SnakeGame<R> {
    width: Coord,
    height: Coord,
    snake: Snake,
    apple: Option<Coords>,
    score: u32,
    delay: f64,
    state: GameState,
    config: GameConfig,
    rng: R,
}

impl<R: Rng> SnakeGame<R> {
    /// Starts a run on a board of `size`, with the snake centered and heading up.
    pub fn new(size: Coords, config: GameConfig, rng: R) -> Result<Self, GameError> {
        config.validate()?;

        let (width, height) = size;
        let too_small = GameError::BoardTooSmall { width, height, length: config.snake_length };
        let length = Coord::try_from(config.snake_length).map_err(|_| too_small.clone())?;
        let center = (width / 2, height / 2);
        let tail_y = i64::from(center.1) + i64::from(length) - 1;

        if width < 2 || height < 2 || tail_y > i64::from(height) - 1 {
            return Err(too_small);
        }

        let mut game = SnakeGame {
            width,
            height,
            snake: Snake::new(center, length, Direction::Up),
            apple: None,
            score: 0,
            delay: config.initial_delay,
            state: GameState::Running,
            config,
            rng,
        };
        game.place_apple();

        info!(width, height, length = game.snake.len(), "new game");
        Ok(game)
    }

    /// Points the snake in `direction`. Reversals are accepted as is.
    pub fn change_direction(&mut self, direction: Direction) {
        self.snake.set_direction(direction);

        if self.config.grow_on_turn {
            self.snake.grow();
        }
    }

    /// Advances the game one step and stages the result on `screen`.
    ///
    /// Once a tick returns [`TickResult::Lost`] the game is over for good and
    /// further ticks do nothing.
    pub fn tick<S: Screen + ?Sized>(&mut self, screen: &mut S) -> TickResult {
        if self.state == GameState::Lost {
            return TickResult::Lost;
        }

        let head = self.snake.move_step();

        if self.hits_border(head) || self.snake.bites_itself() {
            self.state = GameState::Lost;
            info!(score = self.score, length = self.snake.len(), ?head, "snake crashed");
            return TickResult::Lost;
        }

        if self.apple == Some(head) {
            self.score += 1;
            self.snake.grow();
            self.place_apple();
            self.delay *= self.config.speedup;
            debug!(score = self.score, delay = self.delay, apple = ?self.apple, "apple eaten");
        }

        self.draw(screen);
        TickResult::Continue
    }

    /// Stages the snake, apple and score for the next refresh.
    pub fn draw<S: Screen + ?Sized>(&self, screen: &mut S) {
        screen.draw_snake(self.snake.body());
        screen.draw_apple(self.apple);
        screen.show_score(self.score);
    }

    pub fn get_delay(&self) -> f64 {
        self.delay
    }

    pub fn body(&self) -> &[Coords] {
        self.snake.body()
    }

    pub fn head(&self) -> Coords {
        self.snake.head()
    }

    pub fn apple(&self) -> Option<Coords> {
        self.apple
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn size(&self) -> Coords {
        (self.width, self.height)
    }

    fn hits_border(&self, (x, y): Coords) -> bool {
        x <= 0 || x >= self.width || y <= 0 || y >= self.height
    }

    fn place_apple(&mut self) {
        self.apple = self.free_cell();
    }

    /// Uniform pick among interior cells not covered by the snake, or `None`
    /// when the snake fills the board.
    fn free_cell(&mut self) -> Option<Coords> {
        let interior = (self.width as usize - 1) * (self.height as usize - 1);

        for _ in 0..interior * APPLE_ATTEMPTS_PER_CELL {
            let candidate = (self.rng.gen_range(1..self.width), self.rng.gen_range(1..self.height));
            if !self.snake.occupies(candidate) {
                return Some(candidate);
            }
        }

        let snake = &self.snake;
        let free: Vec<Coords> = (1..self.height)
            .flat_map(|y| (1..self.width).map(move |x| (x, y)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();

        debug!(free = free.len(), "apple sampling fell back to a full scan");
        free.choose(&mut self.rng).copied()
    }

    #[cfg(test)]
    pub fn debug_set_apple(&mut self, pos: Option<Coords>) {
        self.apple = pos;
    }

    #[cfg(test)]
    pub fn debug_set_snake(&mut self, body: &[Coords], direction: Direction) {
        self.snake = Snake::from_body(body.to_vec(), direction);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::display::testing::FakeScreen;
    use Direction::*;

    fn game_on(size: Coords, seed: u64) -> SnakeGame<StdRng> {
        SnakeGame::new(size, GameConfig::default(), StdRng::seed_from_u64(seed)).unwrap()
    }

    fn tiny_game(seed: u64) -> SnakeGame<StdRng> {
        let config = GameConfig { snake_length: 1, ..GameConfig::default() };
        SnakeGame::new((3, 3), config, StdRng::seed_from_u64(seed)).unwrap()
    }

    fn assert_apple_valid(game: &SnakeGame<StdRng>) {
        let (w, h) = game.size();
        let apple = game.apple().expect("board has free cells");
        assert!((1..w).contains(&apple.0) && (1..h).contains(&apple.1), "apple {:?} outside interior", apple);
        assert!(!game.body().contains(&apple), "apple {:?} on the snake", apple);
    }

    #[test]
    fn three_ticks_up_without_apple() {
        let mut screen = FakeScreen::new((20, 10));
        let mut game = game_on((20, 10), 1);
        game.debug_set_apple(Some((1, 1)));

        assert_eq!(game.head(), (10, 5));
        assert_eq!(game.body().len(), 5);

        for _ in 0..3 {
            assert_eq!(game.tick(&mut screen), TickResult::Continue);
        }

        assert_eq!(game.head(), (10, 2));
        assert_eq!(game.body().len(), 5);
        assert_eq!(game.score(), 0);
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(screen.staged.snake, game.body());
        assert_eq!(screen.staged.apple, Some((1, 1)));
    }

    #[test]
    fn eating_grows_scores_and_speeds_up() {
        let mut screen = FakeScreen::new((20, 10));
        let mut game = game_on((20, 10), 2);
        game.debug_set_apple(Some((10, 4)));
        let delay = game.get_delay();

        assert_eq!(game.tick(&mut screen), TickResult::Continue);

        assert_eq!(game.score(), 1);
        assert_eq!(game.body().len(), 6);
        assert_eq!(game.get_delay(), delay * 0.9);
        assert!(game.get_delay() < delay);
        assert_ne!(game.apple(), Some((10, 4)));
        assert_apple_valid(&game);
        assert_eq!(screen.staged.score, 1);
    }

    #[test]
    fn moving_left_loses_exactly_at_the_border() {
        let mut screen = FakeScreen::new((20, 10));
        let mut game = game_on((20, 10), 3);
        game.debug_set_apple(Some((19, 9)));
        game.change_direction(Left);

        loop {
            let result = game.tick(&mut screen);
            if game.head().0 <= 0 {
                assert_eq!(result, TickResult::Lost);
                break;
            }
            assert_eq!(result, TickResult::Continue);
        }
        assert_eq!(game.head(), (0, 5));
        assert_eq!(game.state(), GameState::Lost);
    }

    #[test]
    fn touching_any_border_is_a_loss() {
        for (direction, ticks) in [(Up, 5), (Right, 10), (Left, 10)] {
            let mut screen = FakeScreen::new((20, 10));
            let mut game = game_on((20, 10), 4);
            game.debug_set_apple(Some((1, 9)));
            game.change_direction(direction);

            for _ in 1..ticks {
                assert_eq!(game.tick(&mut screen), TickResult::Continue, "{:?}", direction);
            }
            assert_eq!(game.tick(&mut screen), TickResult::Lost, "{:?}", direction);
        }
    }

    #[test]
    fn bottom_border_is_a_loss() {
        let mut screen = FakeScreen::new((20, 10));
        let mut game = game_on((20, 10), 5);
        game.debug_set_apple(Some((1, 1)));
        game.debug_set_snake(&[(3, 8), (3, 7), (3, 6)], Down);

        assert_eq!(game.tick(&mut screen), TickResult::Continue);
        assert_eq!(game.tick(&mut screen), TickResult::Lost);
        assert_eq!(game.head(), (3, 10));
    }

    #[test]
    fn running_into_the_body_is_a_loss() {
        let mut screen = FakeScreen::new((20, 10));
        let mut game = game_on((20, 10), 6);
        game.debug_set_apple(Some((1, 1)));
        game.debug_set_snake(&[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)], Left);

        game.change_direction(Down);
        assert_eq!(game.tick(&mut screen), TickResult::Lost);
        assert_eq!(game.head(), (5, 6));
    }

    #[test]
    fn following_the_tail_is_not_a_collision() {
        let mut screen = FakeScreen::new((20, 10));
        let mut game = game_on((20, 10), 7);
        game.debug_set_apple(Some((1, 1)));
        // Square loop: the head moves into the cell the tail is leaving.
        game.debug_set_snake(&[(5, 5), (6, 5), (6, 6), (5, 6)], Left);

        game.change_direction(Down);
        assert_eq!(game.tick(&mut screen), TickResult::Continue);
        assert_eq!(game.head(), (5, 6));
    }

    #[test]
    fn reversal_is_accepted_and_bites_the_neck() {
        let mut screen = FakeScreen::new((20, 10));
        let mut game = game_on((20, 10), 8);
        game.debug_set_apple(Some((1, 1)));

        game.change_direction(Down);
        assert_eq!(game.direction(), Down);
        assert_eq!(game.tick(&mut screen), TickResult::Lost);
    }

    #[test]
    fn lost_game_stays_lost_and_frozen() {
        let mut screen = FakeScreen::new((20, 10));
        let mut game = game_on((20, 10), 9);
        game.change_direction(Down);
        assert_eq!(game.tick(&mut screen), TickResult::Lost);

        let body = game.body().to_vec();
        assert_eq!(game.tick(&mut screen), TickResult::Lost);
        assert_eq!(game.body(), &body[..]);
    }

    #[test]
    fn turning_grows_only_with_the_flag() {
        let mut game = game_on((20, 10), 10);
        game.change_direction(Left);
        game.change_direction(Up);
        assert_eq!(game.body().len(), 5);

        let config = GameConfig { grow_on_turn: true, ..GameConfig::default() };
        let mut game = SnakeGame::new((20, 10), config, StdRng::seed_from_u64(10)).unwrap();
        game.change_direction(Left);
        game.change_direction(Up);
        assert_eq!(game.body().len(), 7);
    }

    #[test]
    fn segments_grown_by_turning_unfold_without_collisions() {
        let mut screen = FakeScreen::new((20, 10));
        let config = GameConfig { grow_on_turn: true, ..GameConfig::default() };
        let mut game = SnakeGame::new((20, 10), config, StdRng::seed_from_u64(13)).unwrap();
        game.debug_set_apple(Some((1, 1)));

        game.change_direction(Left);
        game.change_direction(Up);
        game.change_direction(Up);
        assert_eq!(game.body().len(), 8);

        for _ in 0..3 {
            assert_eq!(game.tick(&mut screen), TickResult::Continue);
            assert_eq!(game.body().len(), 8);
        }

        let expected: Vec<Coords> = (2..=9).map(|y| (10, y)).collect();
        assert_eq!(game.body(), &expected[..]);
    }

    #[test]
    fn rejects_boards_that_cannot_hold_the_snake() {
        let err = SnakeGame::new((20, 6), GameConfig::default(), StdRng::seed_from_u64(0)).err();
        assert_eq!(err, Some(GameError::BoardTooSmall { width: 20, height: 6, length: 5 }));

        assert!(SnakeGame::new((20, 9), GameConfig::default(), StdRng::seed_from_u64(0)).is_ok());
        assert!(SnakeGame::new((1, 8), GameConfig::default(), StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn rejects_bad_config() {
        let bad = [
            GameConfig { snake_length: 0, ..GameConfig::default() },
            GameConfig { initial_delay: 0.0, ..GameConfig::default() },
            GameConfig { initial_delay: f64::NAN, ..GameConfig::default() },
            GameConfig { initial_delay: f64::INFINITY, ..GameConfig::default() },
            GameConfig { initial_delay: 1e30, ..GameConfig::default() },
            GameConfig { initial_delay: MAX_DELAY_SECS + 1.0, ..GameConfig::default() },
            GameConfig { speedup: 1.5, ..GameConfig::default() },
            GameConfig { speedup: 0.0, ..GameConfig::default() },
        ];

        for config in bad {
            assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))), "{:?}", config);
        }

        let slowest = GameConfig { initial_delay: MAX_DELAY_SECS, ..GameConfig::default() };
        assert_eq!(slowest.validate(), Ok(()));
    }

    #[test]
    fn rejects_lengths_that_do_not_fit_a_coordinate() {
        for snake_length in [usize::MAX, Coord::MAX as usize + 1] {
            let config = GameConfig { snake_length, ..GameConfig::default() };
            let err = SnakeGame::new((20, 10), config, StdRng::seed_from_u64(0)).err();
            assert_eq!(err, Some(GameError::BoardTooSmall { width: 20, height: 10, length: snake_length }));
        }
    }

    #[test]
    fn apple_lands_on_the_last_free_cell() {
        // 3x3 board has a 2x2 interior; three cells taken leaves one.
        let mut game = tiny_game(11);
        game.debug_set_snake(&[(1, 1), (2, 1), (2, 2)], Left);

        game.place_apple();
        assert_eq!(game.apple(), Some((1, 2)));
    }

    #[test]
    fn full_board_has_no_apple_and_next_move_loses() {
        let mut screen = FakeScreen::new((3, 3));
        let mut game = tiny_game(12);
        game.debug_set_snake(&[(1, 1), (2, 1), (2, 2), (1, 2)], Up);

        game.place_apple();
        assert_eq!(game.apple(), None);
        assert_eq!(game.tick(&mut screen), TickResult::Lost);
    }

    proptest! {
        #[test]
        fn random_play_keeps_invariants(
            seed in any::<u64>(),
            grow_on_turn in any::<bool>(),
            moves in proptest::collection::vec(0u8..5, 1..200),
        ) {
            let mut screen = FakeScreen::new((12, 10));
            let config = GameConfig { grow_on_turn, ..GameConfig::default() };
            let mut game = SnakeGame::new((12, 10), config, StdRng::seed_from_u64(seed)).unwrap();

            for step in moves {
                match step {
                    0 => game.change_direction(Up),
                    1 => game.change_direction(Down),
                    2 => game.change_direction(Left),
                    3 => game.change_direction(Right),
                    _ => {}
                }

                let len = game.body().len();
                let score = game.score();
                let delay = game.get_delay();

                if game.tick(&mut screen) == TickResult::Lost {
                    let (x, y) = game.head();
                    let off_board = x <= 0 || x >= 12 || y <= 0 || y >= 10;
                    prop_assert!(off_board || game.body()[1..].contains(&game.head()));
                    break;
                }

                prop_assert!(game.body().len() >= len);
                prop_assert!(!game.body()[1..].contains(&game.head()));
                match game.apple() {
                    Some(apple) => {
                        prop_assert!((1..12).contains(&apple.0) && (1..10).contains(&apple.1));
                        prop_assert!(!game.body().contains(&apple));
                    }
                    // Only once the snake covers every interior cell
                    None => {
                        prop_assert!((1..10).all(|y| (1..12).all(|x| game.body().contains(&(x, y)))));
                    }
                }

                if game.score() > score {
                    prop_assert_eq!(game.score(), score + 1);
                    prop_assert_eq!(game.body().len(), len + 1);
                    prop_assert_eq!(game.get_delay(), delay * 0.9);
                }
            }
        }

        #[test]
        fn apple_always_lands_inside_and_off_the_snake(seed in any::<u64>(), len in 1usize..5) {
            let config = GameConfig { snake_length: len, ..GameConfig::default() };
            let mut game = SnakeGame::new((6, 8), config, StdRng::seed_from_u64(seed)).unwrap();

            for _ in 0..20 {
                game.place_apple();
                assert_apple_valid(&game);
            }
        }
    }
}
