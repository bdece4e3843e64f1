use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Cell, Grid};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Apple,
    Poison,
    Stone,
    SnakeSegment { head: bool },
}

/// Anything that sits on a single cell of the board.
pub trait PositionedEntity {
    fn cell(&self) -> Cell;
    fn kind(&self) -> EntityKind;
}

/// An apple, poison or stone.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Item {
    cell: Cell,
    kind: EntityKind,
}

impl PositionedEntity for Item {
    fn cell(&self) -> Cell {
        self.cell
    }

    fn kind(&self) -> EntityKind {
        self.kind
    }
}

impl Item {
    pub fn new(kind: EntityKind, cell: Cell) -> Self {
        Item { cell, kind }
    }

    /// New item on a random free cell. On a full board it falls back to the
    /// origin, the position every item starts from before placement.
    pub fn spawn<R: Rng + ?Sized>(kind: EntityKind, grid: &Grid, excluded: &HashSet<Cell>, rng: &mut R) -> Self {
        let mut item = Item::new(kind, (0, 0));
        item.place_random(grid, excluded, rng);
        item
    }

    /// Move to a random cell outside `excluded`. Returns `false` and leaves
    /// the item where it is when no such cell exists.
    pub fn place_random<R: Rng + ?Sized>(&mut self, grid: &Grid, excluded: &HashSet<Cell>, rng: &mut R) -> bool {
        match random_free_cell(grid, excluded, rng) {
            Some(cell) => {
                self.cell = cell;
                true
            }
            None => {
                tracing::debug!(kind = ?self.kind, cell = ?self.cell, "no free cell, item stays put");
                false
            }
        }
    }
}

/// Uniform pick among the cells of `grid` not in `excluded`.
pub fn random_free_cell<R: Rng + ?Sized>(grid: &Grid, excluded: &HashSet<Cell>, rng: &mut R) -> Option<Cell> {
    let choices: Vec<Cell> = grid.all_cells().filter(|cell| !excluded.contains(cell)).collect();
    choices.choose(rng).copied()
}
