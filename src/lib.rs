//! Snake on a wrap-around grid, with apples to grow, poison to shrink and
//! stones to avoid.
//!
//! The simulation core (`grid`, `entity`, `snake`, `game`) has no terminal
//! dependencies; `term`, `render`, `input` and `app` put it on screen.

pub mod app;
pub mod config;
pub mod entity;
pub mod game;
pub mod grid;
pub mod input;
pub mod record;
pub mod render;
pub mod snake;
pub mod term;

pub use config::GameConfig;
pub use entity::{EntityKind, Item, PositionedEntity};
pub use game::{Collision, Game, GameState, Phase, TickReport};
pub use grid::{Cell, Grid};
pub use record::{JsonRecordFile, MemoryRecordStore, RecordStore};
pub use snake::{Direction, Snake};
