use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::style::{self, Color};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

pub type TermInt = u16;
pub type Coords = (TermInt, TermInt);

/// One coloured terminal character.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub color: Color,
}

impl Glyph {
    pub const BLANK: Glyph = Glyph { ch: ' ', color: Color::Reset };

    pub fn new(ch: char, color: Color) -> Self {
        Glyph { ch, color }
    }
}

/// Owns stdout in raw mode. Keeps a copy of what is on screen so unchanged
/// cells are not rewritten and popup messages can be taken down again.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Glyph>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let screen = vec![Glyph::BLANK; width as usize * height as usize];
        Ok(TermManager { width, height, stdout: stdout(), screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("Error hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Error disabling raw mode")?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Error leaving alt screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    /// Wait up to `timeout` for input, then drain whatever else is queued.
    pub fn read_key_events(&self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        if !poll(timeout)? {
            return Ok(events);
        }

        loop {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
            if !poll(Duration::ZERO)? {
                break;
            }
        }

        Ok(events)
    }

    pub fn size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Box from the top left corner of the terminal, `size` including the frame.
    pub fn draw_borders(&mut self, size: Coords) -> Result<()> {
        let (width, height) = size;
        let end_x = width - 1;
        let end_y = height - 1;
        let frame = Color::White;

        for x in 0..width {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.print_at((x, 0), Glyph::new(ch, frame))?;
            self.print_at((x, end_y), Glyph::new(ch, frame))?;
        }

        for y in 1..end_y {
            self.print_at((0, y), Glyph::new('|', frame))?;
            self.print_at((end_x, y), Glyph::new('|', frame))?;
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let top_left = (
            (self.width / 2).saturating_sub(msg_width / 2),
            (self.height / 2).saturating_sub(msg_height / 2),
        );

        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, y), Glyph::BLANK)?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), Glyph::new(ch, Color::White))?;
            }
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Put back what the message covered
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let pos = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                if let Some(i) = self.index(pos) {
                    let glyph = self.screen[i];
                    self.print_at_no_save(pos, glyph)?;
                }
            }
        }

        self.flush()
    }

    /// Queue `glyph` at `pos` unless it is already there. Off-screen
    /// positions are ignored.
    pub fn print_at(&mut self, pos: Coords, glyph: Glyph) -> Result<()> {
        let i = match self.index(pos) {
            Some(i) => i,
            None => return Ok(()),
        };

        if self.screen[i] != glyph {
            self.print_at_no_save(pos, glyph)?;
            self.screen[i] = glyph;
        }
        Ok(())
    }

    pub fn print_str_at(&mut self, pos: Coords, text: &str, color: Color) -> Result<()> {
        for (x_diff, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + x_diff as TermInt, pos.1), Glyph::new(ch, color))?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        self.screen = vec![Glyph::BLANK; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: Coords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    fn print_at_no_save(&mut self, pos: Coords, glyph: Glyph) -> Result<()> {
        // Used for messages, so the buffer still holds what lies beneath
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(glyph.color),
            style::Print(glyph.ch)
        )?;
        Ok(())
    }
}
