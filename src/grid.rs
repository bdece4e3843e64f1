use anyhow::{ensure, Result};

use crate::snake::Direction;

/// A grid cell as `(column, row)`, in cell units.
pub type Cell = (u16, u16);

/// Fixed-size toroidal board. Leaving one edge re-enters on the opposite one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
}

impl Grid {
    pub fn new(width: u16, height: u16) -> Result<Self> {
        ensure!(width > 0 && height > 0, "grid must be at least 1x1, got {}x{}", width, height);
        Ok(Grid { width, height })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn center(&self) -> Cell {
        (self.width / 2, self.height / 2)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.0 < self.width && cell.1 < self.height
    }

    /// Every cell of the board in row-major order. Restartable: each call
    /// yields a fresh iterator.
    pub fn all_cells(&self) -> impl Iterator<Item = Cell> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    /// Offset `cell` by `(dx, dy)`, wrapping independently on each axis.
    pub fn wrap(&self, cell: Cell, delta: (i32, i32)) -> Cell {
        let x = (cell.0 as i32 + delta.0).rem_euclid(self.width as i32);
        let y = (cell.1 as i32 + delta.1).rem_euclid(self.height as i32);
        (x as u16, y as u16)
    }

    /// The neighbour of `cell` one step towards `direction`.
    pub fn step(&self, cell: Cell, direction: Direction) -> Cell {
        self.wrap(cell, direction.delta())
    }
}
