use crate::Coords;
use crate::error::TermError;

/// Everything a screen shows on its next refresh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub snake: Vec<Coords>,
    pub apple: Option<Coords>,
    pub score: u32,
    pub lost: bool,
}

/// Where the game gets drawn.
///
/// The `draw_*`, `show_score` and `lost_message` calls only stage data.
/// Nothing reaches the output until `refresh`.
pub trait Screen {
    /// Board size. The border sits on x = 0, x = width, y = 0 and y = height.
    fn get_size(&self) -> Coords;

    fn draw_snake(&mut self, cells: &[Coords]);

    fn draw_apple(&mut self, pos: Option<Coords>);

    fn show_score(&mut self, score: u32);

    /// Latches the end-of-game banner on for every later refresh.
    fn lost_message(&mut self);

    fn refresh(&mut self) -> Result<(), TermError>;
}
