use anyhow::{ensure, Context, Result};
use crossterm::style::Color;

use crate::entity::{EntityKind, PositionedEntity};
use crate::game::{GameState, Phase};
use crate::grid::{Cell, Grid};
use crate::term::{Coords, Glyph, TermInt, TermManager};

/// Terminal columns per grid cell, so cells come out roughly square.
pub const CELL_COLS: TermInt = 2;

const SNAKE_BODY_CHAR: char = '█';
const DEAD_SNAKE_CHAR: char = 'X';
const STONE_CHAR: char = '#';
const COLLECTIBLE_CHARS: [char; 2] = ['(', ')'];

/// Border box plus the status line below it.
pub fn required_size(grid: &Grid) -> Coords {
    (grid.width() * CELL_COLS + 2, grid.height() + 3)
}

/// Largest grid that fits a terminal of `size`.
pub fn fit_grid(size: Coords) -> Result<Grid> {
    let width = size.0.saturating_sub(2) / CELL_COLS;
    let height = size.1.saturating_sub(3);
    Grid::new(width, height).context("terminal too small for any board")
}

/// Draws a `GameState` into the terminal: border, board, status line, and
/// the game over popup.
pub struct Renderer {
    grid: Grid,
}

impl Renderer {
    pub fn new(grid: Grid, term_size: Coords) -> Result<Self> {
        let need = required_size(&grid);
        ensure!(
            term_size.0 >= need.0 && term_size.1 >= need.1,
            "terminal is {}x{} but a {}x{} board needs {}x{}",
            term_size.0, term_size.1, grid.width(), grid.height(), need.0, need.1
        );
        Ok(Renderer { grid })
    }

    pub fn board_size(&self) -> Coords {
        let (w, h) = required_size(&self.grid);
        (w, h - 1)
    }

    pub fn draw(&mut self, term: &mut TermManager, state: &GameState) -> Result<()> {
        match state.phase {
            Phase::Playing => {
                if term.has_message() {
                    term.hide_message()?;
                }
                self.draw_board(term, state)?;
            }
            Phase::GameOver => {
                if !term.has_message() {
                    self.draw_board(term, state)?;
                    term.show_message(&[
                        "Game over!",
                        &*format!("Length: {}", state.snake.target_length()),
                        "",
                        "Press R to play again,",
                        "or Esc to quit.",
                    ])?;
                }
            }
        }

        self.draw_status(term, state)?;
        term.flush()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_board(&self, term: &mut TermManager, state: &GameState) -> Result<()> {
        let dead = state.phase == Phase::GameOver;
        let mut frame = vec![[Glyph::BLANK; 2]; self.grid.cell_count()];

        for item in state.items() {
            self.paint(&mut frame, item, state, dead);
        }

        // Tail first so the head ends up on top
        let segments: Vec<_> = state.snake.segments().collect();
        for segment in segments.iter().rev() {
            self.paint(&mut frame, segment, state, dead);
        }

        for cell in self.grid.all_cells() {
            let glyphs = frame[self.index(cell)];
            let origin = self.screen_pos(cell);
            for (dx, glyph) in glyphs.iter().enumerate() {
                term.print_at((origin.0 + dx as TermInt, origin.1), *glyph)?;
            }
        }

        Ok(())
    }

    fn paint<E: PositionedEntity>(&self, frame: &mut [[Glyph; 2]], entity: &E, state: &GameState, dead: bool) {
        let cell = entity.cell();
        if !self.grid.contains(cell) {
            return;
        }
        frame[self.index(cell)] = glyphs_for(entity.kind(), state, dead);
    }

    fn draw_status(&self, term: &mut TermManager, state: &GameState) -> Result<()> {
        let row = self.grid.height() + 2;
        let width = term.size().0 as usize;
        let text = format!(
            " Length: {} | Record: {} | Speed: {} | +/- speed, Esc quit",
            state.snake.target_length(),
            state.record,
            state.speed
        );
        let line = format!("{text:<width$}", text = text, width = width);
        let line: String = line.chars().take(width).collect();

        term.print_str_at((0, row), &line, Color::White)
    }

    fn index(&self, cell: Cell) -> usize {
        self.grid.width() as usize * cell.1 as usize + cell.0 as usize
    }

    fn screen_pos(&self, cell: Cell) -> Coords {
        (1 + cell.0 * CELL_COLS, 1 + cell.1)
    }
}

fn glyphs_for(kind: EntityKind, state: &GameState, dead: bool) -> [Glyph; 2] {
    let pair = |ch: char, color: Color| [Glyph::new(ch, color); 2];

    match kind {
        EntityKind::Apple => COLLECTIBLE_CHARS.map(|ch| Glyph::new(ch, Color::Red)),
        EntityKind::Poison => COLLECTIBLE_CHARS.map(|ch| Glyph::new(ch, Color::Magenta)),
        EntityKind::Stone => pair(STONE_CHAR, Color::DarkGrey),
        EntityKind::SnakeSegment { .. } if dead => pair(DEAD_SNAKE_CHAR, Color::Red),
        EntityKind::SnakeSegment { head: true } => pair(state.snake.head_char(), Color::Green),
        EntityKind::SnakeSegment { head: false } => pair(SNAKE_BODY_CHAR, Color::DarkGreen),
    }
}
