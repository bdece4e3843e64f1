use std::collections::VecDeque;

use crate::entity::{EntityKind, PositionedEntity};
use crate::grid::{Cell, Grid};
use Direction::*;

/// Below this target length the body cannot fold back onto the head.
const MIN_BITING_LENGTH: usize = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const DEFAULT: Direction = Right;

    /// Unit displacement `(dx, dy)` with `y` growing downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// One body cell of the snake, as seen by the renderer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Segment {
    pub cell: Cell,
    pub is_head: bool,
}

impl PositionedEntity for Segment {
    fn cell(&self) -> Cell {
        self.cell
    }

    fn kind(&self) -> EntityKind {
        EntityKind::SnakeSegment { head: self.is_head }
    }
}

/// Ordered body with the head at the front. `target_length` runs ahead of
/// the actual body length while the snake is growing or shrinking.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
    target_length: usize,
}

impl Snake {
    pub fn new(head: Cell) -> Self {
        Snake { body: VecDeque::from(vec![head]), direction: Direction::DEFAULT, target_length: 1 }
    }

    /// A fresh length-1 snake in the middle of `grid`.
    pub fn centered(grid: &Grid) -> Self {
        Snake::new(grid.center())
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.body.iter().enumerate().map(|(i, cell)| Segment { cell: *cell, is_head: i == 0 })
    }

    /// Advance one cell, wrapping around the grid. At most one tail cell is
    /// dropped per move, and only while the body is longer than the target.
    pub fn move_step(&mut self, grid: &Grid) -> Cell {
        let new_head = grid.step(self.head(), self.direction);
        self.body.push_front(new_head);

        if self.body.len() > self.target_length {
            self.body.pop_back();
        }

        new_head
    }

    /// Change the target length by `delta`. Over-shrinking clamps to 1 and
    /// cuts the body down to the head at once.
    pub fn grow(&mut self, delta: i32) {
        let target = self.target_length as i64 + delta as i64;

        if target < 1 {
            self.target_length = 1;
            self.body.truncate(1);
        } else {
            self.target_length = target as usize;
        }
    }

    /// Queue a new heading for the next move. Reversing is ignored unless
    /// the snake is a single cell.
    pub fn set_direction(&mut self, new_direction: Direction) {
        if new_direction == self.direction.opposite() && self.target_length > 1 {
            return;
        }

        self.direction = new_direction;
    }

    pub fn self_collision(&self) -> bool {
        if self.target_length < MIN_BITING_LENGTH {
            return false;
        }

        let head = self.head();
        self.body.iter().skip(1).any(|cell| *cell == head)
    }

    pub fn reset(&mut self, grid: &Grid) {
        *self = Snake::centered(grid);
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(32, 24).unwrap()
    }

    #[test]
    fn test_opposites() {
        assert_eq!(Up.opposite(), Down);
        assert_eq!(Down.opposite(), Up);
        assert_eq!(Left.opposite(), Right);
        assert_eq!(Right.opposite(), Left);
    }

    #[test]
    fn test_new_snake_is_centered() {
        let snake = Snake::centered(&grid());
        assert_eq!(snake.head(), (16, 12));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.target_length(), 1);
        assert_eq!(snake.direction(), Right);
    }

    #[test]
    fn test_move_keeps_length() {
        let grid = grid();
        let mut snake = Snake::centered(&grid);

        assert_eq!(snake.move_step(&grid), (17, 12));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), (17, 12));
    }

    #[test]
    fn test_move_wraps_around() {
        let grid = grid();
        let mut snake = Snake::new((31, 0));
        snake.move_step(&grid);
        assert_eq!(snake.head(), (0, 0));

        snake.set_direction(Up);
        snake.move_step(&grid);
        assert_eq!(snake.head(), (0, 23));
    }

    #[test]
    fn test_growth_lag() {
        let grid = grid();
        let mut snake = Snake::centered(&grid);

        snake.grow(1);
        assert_eq!(snake.len(), 1);

        snake.move_step(&grid);
        assert_eq!(snake.len(), 2);

        snake.move_step(&grid);
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.body().iter().copied().collect::<Vec<_>>(), vec![(18, 12), (17, 12)]);
    }

    #[test]
    fn test_shrink_drops_one_tail_cell_per_move() {
        let grid = grid();
        let mut snake = Snake::centered(&grid);
        snake.grow(4);
        for _ in 0..4 {
            snake.move_step(&grid);
        }
        assert_eq!(snake.len(), 5);

        snake.grow(-3);
        assert_eq!(snake.target_length(), 2);
        assert_eq!(snake.len(), 5);

        // Head in, one tail cell out: the body keeps its length.
        for _ in 0..3 {
            snake.move_step(&grid);
            assert_eq!(snake.len(), 5);
            assert_eq!(snake.target_length(), 2);
        }

        // Growing back above the body length lets it lengthen again.
        snake.grow(4);
        snake.move_step(&grid);
        assert_eq!(snake.len(), 6);
    }

    #[test]
    fn test_shrink_floor_collapses_body() {
        let grid = grid();
        let mut snake = Snake::centered(&grid);
        snake.grow(2);
        snake.move_step(&grid);
        snake.move_step(&grid);
        let head = snake.head();

        snake.grow(-1);
        snake.grow(-1);
        assert_eq!(snake.target_length(), 1);
        assert_eq!(snake.len(), 3);

        snake.grow(-1);
        assert_eq!(snake.target_length(), 1);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), head);

        snake.grow(-5);
        assert_eq!(snake.target_length(), 1);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_anti_reversal() {
        let grid = grid();
        let mut single = Snake::centered(&grid);
        single.set_direction(Left);
        assert_eq!(single.direction(), Left);

        let mut long = Snake::centered(&grid);
        long.grow(1);
        long.set_direction(Left);
        assert_eq!(long.direction(), Right);

        long.set_direction(Up);
        assert_eq!(long.direction(), Up);
    }

    #[test]
    fn test_direction_applies_on_next_move() {
        let grid = grid();
        let mut snake = Snake::centered(&grid);
        snake.set_direction(Down);
        assert_eq!(snake.head(), (16, 12));

        snake.move_step(&grid);
        assert_eq!(snake.head(), (16, 13));
    }

    #[test]
    fn test_short_snake_never_bites() {
        let mut snake = Snake::new((5, 5));
        snake.grow(2);
        snake.body = VecDeque::from(vec![(5, 5), (5, 5), (5, 5)]);
        assert!(!snake.self_collision());
    }

    #[test]
    fn test_self_collision_in_loop() {
        let grid = grid();
        let mut snake = Snake::centered(&grid);
        snake.grow(4);
        for _ in 0..4 {
            snake.move_step(&grid);
        }

        for dir in [Down, Left] {
            snake.set_direction(dir);
            snake.move_step(&grid);
            assert!(!snake.self_collision());
        }

        snake.set_direction(Up);
        snake.move_step(&grid);
        assert!(snake.self_collision());
    }

    #[test]
    fn test_reset() {
        let grid = grid();
        let mut snake = Snake::new((1, 1));
        snake.grow(5);
        snake.set_direction(Down);
        snake.move_step(&grid);

        snake.reset(&grid);
        assert_eq!(snake.head(), grid.center());
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.target_length(), 1);
        assert_eq!(snake.direction(), Right);
    }

    #[test]
    fn test_segments_mark_head() {
        let grid = grid();
        let mut snake = Snake::centered(&grid);
        snake.grow(1);
        snake.move_step(&grid);

        let segments: Vec<Segment> = snake.segments().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].kind(), EntityKind::SnakeSegment { head: true });
        assert_eq!(segments[1].kind(), EntityKind::SnakeSegment { head: false });
        assert_eq!(segments[1].cell(), (16, 12));
    }
}
