use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::snake::Direction::{self, *};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    SpeedUp,
    SpeedDown,
    Restart,
    Quit,
}

/// Map a key press to a game command. Releases and repeats are ignored.
pub fn command_for(ev: &KeyEvent) -> Option<Command> {
    if ev.kind != KeyEventKind::Press {
        return None;
    }

    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    let command = match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Command::Turn(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Command::Turn(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Command::Turn(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Command::Turn(Right),
        KeyCode::Char('+') | KeyCode::Char('=') => Command::SpeedUp,
        KeyCode::Char('-') | KeyCode::Char('_') => Command::SpeedDown,
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };

    Some(command)
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
