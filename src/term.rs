use crate::{Coords, TermInt};
use std::io::{stdout, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{Attribute, Color, ContentStyle, StyledContent};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};

/// One styled character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub color: Color,
    pub bold: bool,
}

impl Glyph {
    pub const BLANK: Glyph = Glyph { ch: ' ', color: Color::Reset, bold: false };

    pub fn new(ch: char, color: Color) -> Self {
        Glyph { ch, color, bold: false }
    }

    pub fn bold(self) -> Self {
        Glyph { bold: true, ..self }
    }
}

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Glyph>,
    current_msg: Option<Message>,
}

#[derive(Debug, Clone, Copy)]
pub struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Failed to read terminal size")?;
        Ok(Self::with_size(width, height))
    }

    pub fn with_size(width: TermInt, height: TermInt) -> Self {
        let screen = vec![Glyph::BLANK; width as usize * height as usize];
        TermManager { width, height, stdout: stdout(), screen, current_msg: None }
    }

    pub fn setup(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(self.stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)
            .context("Failed to enter alternate screen")?;
        self.clear()
    }

    pub fn restore(&mut self) -> Result<()> {
        execute!(self.stdout, cursor::Show, DisableMouseCapture, LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal::disable_raw_mode().context("Failed to disable raw mode")
    }

    pub fn size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Adopts a new terminal size. The caller is expected to redraw.
    pub fn resize(&mut self, width: TermInt, height: TermInt) {
        self.width = width;
        self.height = height;
        self.screen = vec![Glyph::BLANK; width as usize * height as usize];
        self.current_msg = None;
    }

    pub fn glyph_at(&self, pos: Coords) -> Option<Glyph> {
        self.index(pos).map(|i| self.screen[i])
    }

    /// Draws a glyph and remembers it. Positions off screen are ignored.
    pub fn print_at(&mut self, pos: Coords, glyph: Glyph) -> Result<()> {
        if let Some(i) = self.index(pos) {
            self.screen[i] = glyph;
            self.print_at_no_save(pos, glyph)?;
        }
        Ok(())
    }

    pub fn print_str_at(&mut self, pos: Coords, text: &str, color: Color) -> Result<()> {
        for (i, ch) in text.chars().enumerate() {
            let x = pos.0 as usize + i;
            if x >= self.width as usize {
                break;
            }
            self.print_at((x as TermInt, pos.1), Glyph::new(ch, color))?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, style::ResetColor, terminal::Clear(ClearType::All))
            .context("Failed to clear terminal")?;
        self.screen = vec![Glyph::BLANK; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Failed to flush terminal")
    }

    /// Shows a centered box over whatever is on screen, keeping the content
    /// underneath so `hide_message` can put it back.
    pub fn show_message(&mut self, lines: &[&str]) -> Result<Message> {
        if self.has_message() {
            self.hide_message()?;
        }

        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let msg_width = ((longest + 4) as TermInt).min(self.width);
        let msg_height = ((lines.len() + 2) as TermInt).min(self.height);
        let top_left = (
            (self.width / 2).saturating_sub(msg_width / 2),
            (self.height / 2).saturating_sub(msg_height / 2),
        );

        for y_diff in 0..msg_height {
            let line = match y_diff {
                0 => "",
                d if d == msg_height - 1 => "",
                d => lines.get(d as usize - 1).copied().unwrap_or(""),
            };
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            for (x_diff, ch) in padded_line.chars().take(msg_width as usize).enumerate() {
                let glyph = Glyph::new(ch, Color::White).bold();
                self.print_at_no_save((top_left.0 + x_diff as TermInt, top_left.1 + y_diff), glyph)?;
            }
        }

        let msg = Message::new(msg_width, msg_height, top_left);
        self.current_msg = Some(msg);
        self.flush()?;
        Ok(msg)
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let Some(msg) = self.current_msg.take() else {
            return Ok(());
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let pos = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some(glyph) = self.glyph_at(pos) {
                    self.print_at_no_save(pos, glyph)?;
                }
            }
        }

        self.flush()
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
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        let mut content_style = ContentStyle::new();
        content_style.foreground_color = Some(glyph.color);
        if glyph.bold {
            content_style.attributes.set(Attribute::Bold);
        }

        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::PrintStyledContent(StyledContent::new(content_style, glyph.ch))
        )
        .context("Failed to draw to terminal")
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }

    pub fn contains(&self, pos: Coords) -> bool {
        pos.0 >= self.top_left.0
            && pos.0 < self.top_left.0 + self.width
            && pos.1 >= self.top_left.1
            && pos.1 < self.top_left.1 + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_hit_area() {
        let msg = Message::new(10, 4, (5, 3));
        assert!(msg.contains((5, 3)));
        assert!(msg.contains((14, 6)));
        assert!(!msg.contains((15, 6)));
        assert!(!msg.contains((4, 3)));
    }

    #[test]
    fn test_bold_keeps_character() {
        let glyph = Glyph::new('x', Color::Red).bold();
        assert_eq!(glyph.ch, 'x');
        assert!(glyph.bold);
        assert!(!Glyph::BLANK.bold);
    }
}
