use anyhow::Result;
use crossterm::style::Color;

use crate::term::TermManager;
use crate::{Coords, TermInt};

const TOP_MARGIN: usize = 1;

const PROFILE_PIC: [&str; 5] = [
    "  .-----.  ",
    " /  o o  \\ ",
    "|    >    |",
    " \\  '-'  / ",
    "  '-----'  ",
];

const BODY: [(&str, Color); 15] = [
    ("", Color::Reset),
    ("Sam Rivera", Color::White),
    ("systems tinkerer / coffee enthusiast", Color::Grey),
    ("", Color::Reset),
    ("[ Blog ]", Color::Cyan),
    ("", Color::Reset),
    ("[ Projects ]", Color::Cyan),
    ("", Color::Reset),
    ("[ Talks ]", Color::Cyan),
    ("", Color::Reset),
    ("[ Contact ]", Color::Cyan),
    ("", Color::Reset),
    ("", Color::Reset),
    ("Q to leave", Color::DarkGrey),
    ("", Color::Reset),
];

/// The host page the game hides in: a profile card with a few links.
#[derive(Debug, Default)]
pub struct Page {
    scroll: usize,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Scrolls by `delta` lines, clamped to the content. Returns whether the
    /// view moved.
    pub fn scroll_by(&mut self, delta: isize, viewport_height: TermInt) -> bool {
        let max_scroll = content_height().saturating_sub(viewport_height as usize);
        let target = (self.scroll as isize + delta).clamp(0, max_scroll as isize) as usize;
        let moved = target != self.scroll;
        self.scroll = target;
        moved
    }

    pub fn draw(&self, term: &mut TermManager) -> Result<()> {
        term.clear()?;
        let (width, height) = term.size();

        let lines = PROFILE_PIC
            .iter()
            .map(|line| (*line, Color::Magenta))
            .chain(BODY.iter().copied());

        for (i, (line, color)) in lines.enumerate() {
            let Some(row) = self.screen_row(TOP_MARGIN + i, height) else {
                continue;
            };
            term.print_str_at((centered(line, width), row), line, color)?;
        }

        term.flush()
    }

    /// Whether a click at `pos` lands on the profile picture.
    pub fn profile_hit(&self, pos: Coords, size: Coords) -> bool {
        let (width, height) = size;
        PROFILE_PIC.iter().enumerate().any(|(i, line)| {
            let Some(row) = self.screen_row(TOP_MARGIN + i, height) else {
                return false;
            };
            let left = centered(line, width);
            pos.1 == row && pos.0 >= left && pos.0 < left + line.chars().count() as TermInt
        })
    }

    fn screen_row(&self, content_row: usize, height: TermInt) -> Option<TermInt> {
        let row = content_row.checked_sub(self.scroll)?;
        (row < height as usize).then_some(row as TermInt)
    }
}

fn content_height() -> usize {
    TOP_MARGIN + PROFILE_PIC.len() + BODY.len()
}

fn centered(line: &str, width: TermInt) -> TermInt {
    (width / 2).saturating_sub(line.chars().count() as TermInt / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_is_clamped() {
        let mut page = Page::new();
        assert!(!page.scroll_by(-3, 10));

        assert!(page.scroll_by(100, 10));
        assert_eq!(page.scroll(), content_height() - 10);

        // Everything fits: nothing to scroll.
        let mut page = Page::new();
        assert!(!page.scroll_by(5, 200));
        assert_eq!(page.scroll(), 0);
    }

    #[test]
    fn test_profile_hit_box() {
        let page = Page::new();
        let size = (41, 30);
        // The picture is 11 wide, centered on column 20, first row 1.
        assert!(page.profile_hit((15, 1), size));
        assert!(page.profile_hit((25, 5), size));
        assert!(!page.profile_hit((26, 3), size));
        assert!(!page.profile_hit((20, 0), size));
        assert!(!page.profile_hit((20, 6), size));
    }

    #[test]
    fn test_profile_moves_with_scroll() {
        let mut page = Page::new();
        page.scroll_by(2, 10);

        assert!(page.profile_hit((20, 0), (41, 10)));
        assert!(!page.profile_hit((20, 4), (41, 10)));
    }
}
