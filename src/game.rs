use std::collections::HashSet;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::entity::{EntityKind, Item, PositionedEntity};
use crate::grid::{Cell, Grid};
use crate::record::RecordStore;
use crate::snake::{Direction, Snake};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
}

/// What ended the game.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Collision {
    Stone,
    SelfBite,
}

/// What happened during one tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub moved: bool,
    pub apples_eaten: usize,
    pub poisons_eaten: usize,
    pub new_record: bool,
    pub collision: Option<Collision>,
}

/// Everything the renderer needs to draw a frame.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub apples: Vec<Item>,
    pub poisons: Vec<Item>,
    pub stones: Vec<Item>,
    pub record: usize,
    pub speed: u32,
    pub phase: Phase,
}

impl GameState {
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Stones, apples and poisons, in drawing order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.stones.iter().chain(self.apples.iter()).chain(self.poisons.iter())
    }

    /// Snapshot of every cell currently taken by the snake or an item.
    pub fn occupied(&self) -> HashSet<Cell> {
        self.snake.body().iter().copied().chain(self.items().map(|item| item.cell())).collect()
    }
}

/// The simulation: owns the board state, the RNG and the record store, and
/// drives the Playing -> GameOver -> Playing cycle.
pub struct Game {
    config: GameConfig,
    grid: Grid,
    state: GameState,
    store: Box<dyn RecordStore>,
    rng: StdRng,
}

impl Game {
    pub fn new(config: GameConfig, store: Box<dyn RecordStore>) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Game::with_rng(config, store, rng)
    }

    pub fn with_rng(config: GameConfig, store: Box<dyn RecordStore>, rng: StdRng) -> Result<Self> {
        config.validate().context("invalid game config")?;
        let grid = config.grid()?;

        let state = GameState {
            snake: Snake::centered(&grid),
            apples: vec![],
            poisons: vec![],
            stones: vec![],
            record: store.load_record(),
            speed: config.start_speed,
            phase: Phase::Playing,
        };

        let mut game = Game { config, grid, state, store, rng };
        game.populate();

        tracing::info!(
            width = grid.width(),
            height = grid.height(),
            record = game.state.record,
            "new game"
        );
        Ok(game)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn turn(&mut self, direction: Direction) {
        self.state.snake.set_direction(direction);
    }

    pub fn speed_up(&mut self) -> u32 {
        self.state.speed = self.config.clamp_speed(self.state.speed.saturating_add(1));
        self.state.speed
    }

    pub fn speed_down(&mut self) -> u32 {
        self.state.speed = self.config.clamp_speed(self.state.speed.saturating_sub(1));
        self.state.speed
    }

    /// One simulation step: move, then resolve collisions. Does nothing once
    /// the game is over.
    pub fn tick(&mut self) -> TickReport {
        if !self.state.is_playing() {
            return TickReport::default();
        }

        self.state.snake.move_step(&self.grid);

        let mut report = self.check_collisions();
        report.moved = true;
        report
    }

    /// Resolve the head against apples, poisons, stones and the body, in
    /// that order.
    pub fn check_collisions(&mut self) -> TickReport {
        let mut report = TickReport::default();

        let (eaten, new_record) = self.eat(apples_of, 1);
        report.apples_eaten = eaten;
        report.new_record = new_record;

        let (eaten, _) = self.eat(poisons_of, -1);
        report.poisons_eaten = eaten;

        let head = self.state.snake.head();
        if self.state.stones.iter().any(|stone| stone.cell() == head) {
            self.end(Collision::Stone);
            report.collision = Some(Collision::Stone);
            return report;
        }

        if self.state.snake.self_collision() {
            self.end(Collision::SelfBite);
            report.collision = Some(Collision::SelfBite);
        }

        report
    }

    /// Back to Playing with a fresh snake and board. Only valid from
    /// GameOver; returns whether the restart happened.
    pub fn restart(&mut self) -> bool {
        if self.state.is_playing() {
            return false;
        }

        self.state.snake.reset(&self.grid);
        self.state.speed = self.config.start_speed;
        self.populate();
        self.state.phase = Phase::Playing;

        tracing::info!(record = self.state.record, "restarted");
        true
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Consume every collectible in `pick(state)` under the head, applying
    /// `delta` to the target length and relocating each one.
    fn eat(&mut self, pick: fn(&mut GameState) -> &mut Vec<Item>, delta: i32) -> (usize, bool) {
        let head = self.state.snake.head();
        let mut eaten = 0;
        let mut new_record = false;

        for i in 0..pick(&mut self.state).len() {
            if pick(&mut self.state)[i].cell() != head {
                continue;
            }

            self.state.snake.grow(delta);
            let occupied = self.state.occupied();
            pick(&mut self.state)[i].place_random(&self.grid, &occupied, &mut self.rng);
            eaten += 1;

            tracing::debug!(
                delta,
                target_length = self.state.snake.target_length(),
                "collectible eaten"
            );

            if delta > 0 {
                new_record |= self.update_record();
            }
        }

        (eaten, new_record)
    }

    fn update_record(&mut self) -> bool {
        let length = self.state.snake.target_length();
        if length <= self.state.record {
            return false;
        }

        self.state.record = length;
        self.store.save_record(length);
        tracing::info!(record = length, "new record");
        true
    }

    fn end(&mut self, cause: Collision) {
        self.state.phase = Phase::GameOver;
        tracing::info!(?cause, length = self.state.snake.target_length(), "game over");
    }

    /// Scatter apples, stones and poisons over cells not taken by the snake
    /// or by each other.
    fn populate(&mut self) {
        let mut occupied: HashSet<Cell> = self.state.snake.body().iter().copied().collect();

        let mut spawn = |kind: EntityKind, count: usize, occupied: &mut HashSet<Cell>| -> Vec<Item> {
            (0..count)
                .map(|_| {
                    let item = Item::spawn(kind, &self.grid, occupied, &mut self.rng);
                    occupied.insert(item.cell());
                    item
                })
                .collect()
        };

        let apples = spawn(EntityKind::Apple, self.config.apples, &mut occupied);
        let stones = spawn(EntityKind::Stone, self.config.stones, &mut occupied);
        let poisons = spawn(EntityKind::Poison, self.config.poisons, &mut occupied);

        self.state.apples = apples;
        self.state.stones = stones;
        self.state.poisons = poisons;
    }
}

fn apples_of(state: &mut GameState) -> &mut Vec<Item> {
    &mut state.apples
}

fn poisons_of(state: &mut GameState) -> &mut Vec<Item> {
    &mut state.poisons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MemoryRecordStore;

    fn game_with(config: GameConfig) -> Game {
        let config = GameConfig { seed: Some(42), ..config };
        Game::new(config, Box::new(MemoryRecordStore::default())).unwrap()
    }

    fn empty_board(game: &mut Game) {
        let state = game.state_mut();
        state.apples.clear();
        state.poisons.clear();
        state.stones.clear();
    }

    #[test]
    fn test_new_game() {
        let game = game_with(GameConfig::default());
        let state = game.state();

        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.snake.head(), (16, 12));
        assert_eq!(state.speed, 10);
        assert_eq!(state.apples.len(), 3);
        assert_eq!(state.stones.len(), 5);
        assert_eq!(state.poisons.len(), 2);

        // Snake plus ten items, all on distinct cells.
        assert_eq!(state.occupied().len(), 11);
    }

    #[test]
    fn test_item_kinds() {
        let game = game_with(GameConfig::default());
        let state = game.state();
        assert!(state.apples.iter().all(|i| i.kind() == EntityKind::Apple));
        assert!(state.poisons.iter().all(|i| i.kind() == EntityKind::Poison));
        assert!(state.stones.iter().all(|i| i.kind() == EntityKind::Stone));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig { min_speed: 20, ..Default::default() };
        assert!(Game::new(config, Box::new(MemoryRecordStore::default())).is_err());
    }

    #[test]
    fn test_record_loaded_from_store() {
        let game = Game::new(GameConfig::default(), Box::new(MemoryRecordStore::new(12))).unwrap();
        assert_eq!(game.state().record, 12);
    }

    #[test]
    fn test_eat_apple() {
        let mut game = game_with(GameConfig::default());
        empty_board(&mut game);
        game.state_mut().apples.push(Item::new(EntityKind::Apple, (17, 12)));

        let report = game.tick();

        assert_eq!(report.apples_eaten, 1);
        assert!(report.new_record);
        let state = game.state();
        assert_eq!(state.snake.target_length(), 2);
        assert_eq!(state.snake.len(), 2);
        assert_ne!(state.apples[0].cell(), (17, 12));
        assert!(!state.snake.occupies(state.apples[0].cell()));
        assert_eq!(state.record, 2);
        assert_eq!(game.store().load_record(), 2);
    }

    #[test]
    fn test_eat_poison() {
        let mut game = game_with(GameConfig::default());
        empty_board(&mut game);
        game.state_mut().snake.grow(2);
        game.state_mut().poisons.push(Item::new(EntityKind::Poison, (17, 12)));
        game.state_mut().stones.push(Item::new(EntityKind::Stone, (3, 3)));
        game.state_mut().apples.push(Item::new(EntityKind::Apple, (4, 4)));

        let report = game.tick();

        assert_eq!(report.poisons_eaten, 1);
        assert!(!report.new_record);
        let state = game.state();
        assert_eq!(state.snake.target_length(), 2);

        let moved = state.poisons[0].cell();
        assert_ne!(moved, (17, 12));
        assert!(!state.snake.occupies(moved));
        assert!(state.stones.iter().chain(state.apples.iter()).all(|item| item.cell() != moved));
    }

    #[test]
    fn test_poison_on_single_cell_snake() {
        let mut game = game_with(GameConfig::default());
        empty_board(&mut game);
        game.state_mut().poisons.push(Item::new(EntityKind::Poison, (17, 12)));

        game.tick();

        assert_eq!(game.state().snake.target_length(), 1);
        assert_eq!(game.state().snake.len(), 1);
        assert!(game.state().is_playing());
    }

    #[test]
    fn test_stacked_apples_each_count() {
        let mut game = game_with(GameConfig::default());
        empty_board(&mut game);
        game.state_mut().apples.push(Item::new(EntityKind::Apple, (17, 12)));
        game.state_mut().apples.push(Item::new(EntityKind::Apple, (17, 12)));

        let report = game.tick();

        assert_eq!(report.apples_eaten, 2);
        assert_eq!(game.state().snake.target_length(), 3);
        assert_eq!(game.state().record, 3);
        let cells: HashSet<Cell> = game.state().apples.iter().map(|a| a.cell()).collect();
        assert_eq!(cells.len(), 2);
    }

    #[test]
    fn test_stone_ends_game() {
        let mut game = game_with(GameConfig::default());
        empty_board(&mut game);
        game.state_mut().stones.push(Item::new(EntityKind::Stone, (17, 12)));

        let report = game.tick();

        assert_eq!(report.collision, Some(Collision::Stone));
        assert_eq!(game.state().phase, Phase::GameOver);
    }

    #[test]
    fn test_apple_and_stone_same_tick() {
        let mut game = game_with(GameConfig::default());
        empty_board(&mut game);
        game.state_mut().apples.push(Item::new(EntityKind::Apple, (17, 12)));
        game.state_mut().stones.push(Item::new(EntityKind::Stone, (17, 12)));

        let report = game.tick();

        assert_eq!(report.apples_eaten, 1);
        assert_eq!(report.collision, Some(Collision::Stone));
        assert_eq!(game.state().record, 2);
    }

    #[test]
    fn test_tick_after_game_over_is_noop() {
        let mut game = game_with(GameConfig::default());
        empty_board(&mut game);
        game.state_mut().phase = Phase::GameOver;
        let head = game.state().snake.head();

        let report = game.tick();

        assert!(!report.moved);
        assert_eq!(game.state().snake.head(), head);
    }

    #[test]
    fn test_restart_only_from_game_over() {
        let mut game = game_with(GameConfig::default());
        assert!(!game.restart());

        game.state_mut().phase = Phase::GameOver;
        game.speed_up();
        game.state_mut().snake.grow(3);

        assert!(game.restart());
        let state = game.state();
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.speed, 10);
        assert_eq!(state.snake.target_length(), 1);
        assert_eq!(state.snake.head(), (16, 12));
        assert_eq!(state.occupied().len(), 11);
    }

    #[test]
    fn test_speed_bounds() {
        let mut game = game_with(GameConfig::default());
        for _ in 0..30 {
            game.speed_up();
        }
        assert_eq!(game.state().speed, 25);

        for _ in 0..30 {
            game.speed_down();
        }
        assert_eq!(game.state().speed, 5);
    }

    #[test]
    fn test_crowded_board_keeps_positions() {
        let config = GameConfig { grid_width: 2, grid_height: 2, apples: 3, stones: 3, poisons: 3, ..Default::default() };
        let game = game_with(config);

        // Only three free cells: the rest stay at the origin.
        assert_eq!(game.state().items().count(), 9);
        assert_eq!(game.state().occupied().len(), 4);
    }
}
