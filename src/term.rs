use crate::{Coord, Coords};
use crate::display::{Frame, Screen};
use crate::error::TermError;
use crate::input::{Key, KeySource};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Color};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

const SNAKE_CHAR: char = 'O';
const APPLE_CHAR: char = '*';
const LOST_BANNER: &str = " Y O U   L O S T ";

// The lost banner starts 9 columns left of center and must fit on screen
const MIN_COLS: u16 = 22;
const MIN_ROWS: u16 = 5;

/// crossterm-backed screen. Draws the board in the alternate screen.
pub struct TermManager {
    width: Coord,
    height: Coord,
    stdout: Stdout,
    frame: Frame,
}

impl TermManager {
    pub fn new() -> Result<Self, TermError> {
        let (cols, rows) = terminal::size()?;
        if cols < MIN_COLS || rows < MIN_ROWS {
            return Err(TermError::TooSmall { cols, rows, min_cols: MIN_COLS, min_rows: MIN_ROWS });
        }

        Ok(TermManager {
            width: Coord::from(cols) - 2,
            height: Coord::from(rows) - 2,
            stdout: stdout(),
            frame: Frame::default(),
        })
    }

    pub fn setup(&mut self) -> Result<(), TermError> {
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide, cursor::DisableBlinking)?;
        terminal::enable_raw_mode()?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<(), TermError> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::EnableBlinking, cursor::Show, LeaveAlternateScreen)?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self) -> Result<(), TermError> {
        for x in 0..=self.width {
            self.print_at((x, 0), '-')?;
            self.print_at((x, self.height), '-')?;
        }

        for y in 0..=self.height {
            self.print_at((0, y), '|')?;
            self.print_at((self.width, y), '|')?;
        }

        Ok(())
    }

    fn print_at(&mut self, pos: Coords, ch: char) -> Result<(), TermError> {
        let (x, y) = to_cell(pos)?;
        queue!(self.stdout, cursor::MoveTo(x, y), style::Print(ch))?;
        Ok(())
    }

    fn print_highlighted(&mut self, pos: Coords, text: &str, color: Option<Color>) -> Result<(), TermError> {
        let (x, y) = to_cell(pos)?;
        queue!(self.stdout, cursor::MoveTo(x, y))?;
        if let Some(color) = color {
            queue!(self.stdout, style::SetForegroundColor(color))?;
        }
        queue!(
            self.stdout,
            style::SetAttribute(Attribute::Reverse),
            style::Print(text),
            style::SetAttribute(Attribute::Reset),
            style::ResetColor
        )?;
        Ok(())
    }
}

impl Screen for TermManager {
    fn get_size(&self) -> Coords {
        (self.width, self.height)
    }

    fn draw_snake(&mut self, cells: &[Coords]) {
        self.frame.snake = cells.to_vec();
    }

    fn draw_apple(&mut self, pos: Option<Coords>) {
        self.frame.apple = pos;
    }

    fn show_score(&mut self, score: u32) {
        self.frame.score = score;
    }

    fn lost_message(&mut self) {
        self.frame.lost = true;
    }

    fn refresh(&mut self) -> Result<(), TermError> {
        queue!(self.stdout, terminal::BeginSynchronizedUpdate, terminal::Clear(ClearType::All))?;
        self.draw_borders()?;

        let snake = std::mem::take(&mut self.frame.snake);
        let drawn = snake.iter().try_for_each(|pos| self.print_at(*pos, SNAKE_CHAR));
        self.frame.snake = snake;
        drawn?;

        if let Some(apple) = self.frame.apple {
            let (x, y) = to_cell(apple)?;
            queue!(
                self.stdout,
                cursor::MoveTo(x, y),
                style::SetForegroundColor(Color::Red),
                style::Print(APPLE_CHAR),
                style::ResetColor
            )?;
        }

        let score = format!("Score: {:3} ", self.frame.score);
        self.print_highlighted((0, 0), &score, None)?;

        if self.frame.lost {
            let pos = (self.width / 2 - 9, self.height / 2);
            self.print_highlighted(pos, LOST_BANNER, Some(Color::Red))?;
        }

        queue!(self.stdout, terminal::EndSynchronizedUpdate)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Reads keys from the terminal's event queue.
pub struct TermKeys;

impl KeySource for TermKeys {
    fn poll_key(&mut self) -> Result<Option<Key>, TermError> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(ev) = event::read()? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(map_key(&ev));
                }
            }
        }

        Ok(None)
    }
}

fn map_key(ev: &KeyEvent) -> Option<Key> {
    if ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Key::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Key::Up),
        KeyCode::Char('a') | KeyCode::Left => Some(Key::Left),
        KeyCode::Char('s') | KeyCode::Down => Some(Key::Down),
        KeyCode::Char('d') | KeyCode::Right => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Quit),
        _ => None,
    }
}

fn to_cell((x, y): Coords) -> Result<(u16, u16), TermError> {
    match (u16::try_from(x), u16::try_from(y)) {
        (Ok(col), Ok(row)) => Ok((col, row)),
        _ => Err(TermError::OffScreen { x, y }),
    }
}
