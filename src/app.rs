use std::time::{Duration, Instant};

use anyhow::Result;

use crate::game::Game;
use crate::input::{self, Command};
use crate::render::Renderer;
use crate::snake::Direction;
use crate::term::TermManager;

/// Paces ticks at `speed` per second. Owned by the main loop.
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Clock { last_tick: Instant::now() }
    }

    pub fn interval(speed: u32) -> Duration {
        Duration::from_secs(1) / speed.max(1)
    }

    pub fn remaining(&self, speed: u32) -> Duration {
        Clock::interval(speed).saturating_sub(self.last_tick.elapsed())
    }

    pub fn tick_due(&self, speed: u32) -> bool {
        self.remaining(speed).is_zero()
    }

    pub fn restart(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::new()
    }
}

/// The interactive terminal game.
pub struct SnakeApp {
    game: Game,
    term: TermManager,
    renderer: Renderer,
}

impl SnakeApp {
    pub fn new(game: Game, term: TermManager) -> Result<Self> {
        let renderer = Renderer::new(*game.grid(), term.size())?;
        Ok(SnakeApp { game, term, renderer })
    }

    /// Run until the player quits. The terminal is restored even when the
    /// loop fails.
    pub fn run(&mut self) -> Result<()> {
        self.term.setup()?;
        let result = self.play();
        self.term.restore()?;
        result
    }

    ///////////////////////////////////////////////////////////////////////////

    fn play(&mut self) -> Result<()> {
        self.term.clear()?;
        self.term.draw_borders(self.renderer.board_size())?;
        self.renderer.draw(&mut self.term, self.game.state())?;

        if !self.show_intro()? {
            return Ok(());
        }

        let mut clock = Clock::new();
        let mut dir_change: Option<Direction> = None;

        loop {
            let speed = self.game.state().speed;

            for key_ev in self.term.read_key_events(clock.remaining(speed))? {
                match input::command_for(&key_ev) {
                    Some(Command::Quit) => {
                        tracing::info!(record = self.game.state().record, "quit");
                        return Ok(());
                    }
                    Some(Command::Turn(dir)) => dir_change = Some(dir),
                    Some(Command::SpeedUp) => {
                        self.game.speed_up();
                    }
                    Some(Command::SpeedDown) => {
                        self.game.speed_down();
                    }
                    Some(Command::Restart) => {
                        if self.game.restart() {
                            dir_change = None;
                        }
                    }
                    None => {}
                }
            }

            if !clock.tick_due(self.game.state().speed) {
                continue;
            }
            clock.restart();

            if let Some(dir) = dir_change.take() {
                self.game.turn(dir);
            }

            let report = self.game.tick();
            if report.moved {
                tracing::trace!(?report, "tick");
            }

            self.renderer.draw(&mut self.term, self.game.state())?;
        }
    }

    /// Returns `false` if the player quit from the intro screen.
    fn show_intro(&mut self) -> Result<bool> {
        let lines = &[
            "Arrow keys or WASD to move",
            "+ / - to change speed",
            "Eat ( ) in red, avoid ( ) in magenta and ##",
            "Esc or CTRL+C to quit",
            "",
            "Press any key to begin",
        ];

        self.term.show_message(lines)?;
        let key_ev = self.term.read_key_blocking()?;
        self.term.hide_message()?;

        Ok(input::command_for(&key_ev) != Some(Command::Quit))
    }
}
