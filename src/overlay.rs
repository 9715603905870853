use anyhow::Result;
use crossterm::style::Color;

use crate::input::{PX_PER_COL, PX_PER_ROW};
use crate::ports::Presentation;
use crate::render::{Canvas, Paint};
use crate::term::{Glyph, Message, TermManager};
use crate::{Coords, TermInt};

/// Rows above the board taken by the score bar.
pub const HEADER_ROWS: TermInt = 1;

const CLOSE_LABEL: &str = "[x] Close";
const START_HINT: &str = "Arrows, WASD or drag to steer";
const SEGMENT_CHAR: char = '█';
const FOOD_CHAR: char = '●';

const HEADER_COLOR: Color = Color::Grey;
const SCORE_COLOR: Color = Color::White;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayHit {
    Close,
    PlayAgain,
    Board,
}

/// Full-screen game overlay drawn on the terminal: a score bar on top and the
/// board canvas below it.
pub struct Overlay {
    term: TermManager,
    mounted: bool,
    scroll_locked: bool,
    score: u32,
    high_score: u32,
    game_over: Option<Message>,
    frame: Vec<Option<Glyph>>,
    // Header columns the score text currently covers, and how far it may grow
    // before running into the hint or the close button.
    scores_width: usize,
    scores_room: usize,
}

impl Overlay {
    pub fn new(term: TermManager) -> Self {
        let mut overlay = Overlay {
            term,
            mounted: false,
            scroll_locked: false,
            score: 0,
            high_score: 0,
            game_over: None,
            frame: vec![],
            scores_width: 0,
            scores_room: 0,
        };
        overlay.frame = vec![None; overlay.board_cells()];
        overlay
    }

    pub fn term_mut(&mut self) -> &mut TermManager {
        &mut self.term
    }

    pub fn term_size(&self) -> Coords {
        self.term.size()
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// What a click at a terminal position lands on, if the overlay is up.
    pub fn hit(&self, pos: Coords) -> Option<OverlayHit> {
        if !self.mounted {
            return None;
        }

        if let Some(modal) = self.game_over {
            if modal.contains(pos) {
                return Some(OverlayHit::PlayAgain);
            }
        }

        let (width, _) = self.term.size();
        let close_from = width.saturating_sub(CLOSE_LABEL.len() as TermInt);
        if pos.1 < HEADER_ROWS {
            return (pos.0 >= close_from).then_some(OverlayHit::Close);
        }

        Some(OverlayHit::Board)
    }

    /// Adopts a new terminal size and repaints the overlay chrome.
    pub fn resize_terminal(&mut self, width: TermInt, height: TermInt) -> Result<()> {
        self.term.resize(width, height);
        self.frame = vec![None; self.board_cells()];

        if self.mounted {
            self.term.clear()?;
            self.draw_header()?;
            if self.game_over.take().is_some() {
                self.show_game_over(self.score)?;
            }
        }
        self.term.flush()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn board_size(&self) -> Coords {
        let (width, height) = self.term.size();
        (width, height.saturating_sub(HEADER_ROWS))
    }

    fn board_cells(&self) -> usize {
        let (cols, rows) = self.board_size();
        cols as usize * rows as usize
    }

    fn paint_cell(&mut self, col: i64, row: i64, glyph: Glyph) {
        let (cols, rows) = self.board_size();
        if col < 0 || row < 0 || col >= cols as i64 || row >= rows as i64 {
            return;
        }
        self.frame[row as usize * cols as usize + col as usize] = Some(glyph);
    }

    fn draw_header(&mut self) -> Result<()> {
        let (width, _) = self.term.size();
        for x in 0..width {
            self.term.print_at((x, 0), Glyph::BLANK)?;
        }

        let scores = self.scores_text();
        self.term.print_str_at((0, 0), &scores, SCORE_COLOR)?;
        self.scores_width = scores.len();

        let close_at = width.saturating_sub(CLOSE_LABEL.len() as TermInt);
        self.scores_room = close_at as usize;

        let hint_at = (width / 2).saturating_sub(START_HINT.len() as TermInt / 2);
        if hint_at as usize > scores.len() + 1
            && hint_at as usize + START_HINT.len() + CLOSE_LABEL.len() < width as usize
        {
            self.term.print_str_at((hint_at, 0), START_HINT, HEADER_COLOR)?;
            self.scores_room = hint_at as usize - 1;
        }

        self.term.print_str_at((close_at, 0), CLOSE_LABEL, Color::Red)?;
        self.term.flush()
    }

    /// Repaints the score text alone, falling back to the whole header when
    /// it no longer fits beside the rest.
    fn draw_scores(&mut self) -> Result<()> {
        let scores = self.scores_text();
        if scores.len() > self.scores_room {
            return self.draw_header();
        }

        let padded = format!("{:<width$}", scores, width = self.scores_width.max(scores.len()));
        self.term.print_str_at((0, 0), &padded, SCORE_COLOR)?;
        self.scores_width = scores.len();
        self.term.flush()
    }

    fn scores_text(&self) -> String {
        format!(" Score: {}   High Score: {}", self.score, self.high_score)
    }
}

impl Canvas for Overlay {
    fn size(&self) -> (u32, u32) {
        let (cols, rows) = self.board_size();
        (cols as u32 * PX_PER_COL, rows as u32 * PX_PER_ROW)
    }

    fn clear(&mut self) {
        self.frame.iter_mut().for_each(|cell| *cell = None);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: Paint) {
        let glyph = glyph_for(FOOD_CHAR, paint);
        let (col_x, row_y) = (PX_PER_COL as f32, PX_PER_ROW as f32);

        let first_col = ((cx - radius) / col_x).floor() as i64;
        let last_col = ((cx + radius) / col_x).ceil() as i64;
        let first_row = ((cy - radius) / row_y).floor() as i64;
        let last_row = ((cy + radius) / row_y).ceil() as i64;

        let mut painted = false;
        for row in first_row..last_row {
            for col in first_col..last_col {
                let dx = (col as f32 + 0.5) * col_x - cx;
                let dy = (row as f32 + 0.5) * row_y - cy;
                if dx * dx + dy * dy <= radius * radius {
                    self.paint_cell(col, row, glyph);
                    painted = true;
                }
            }
        }

        // Too small to cover any cell center: mark the cell holding the center.
        if !painted {
            self.paint_cell((cx / col_x).floor() as i64, (cy / row_y).floor() as i64, glyph);
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: Paint) {
        let glyph = glyph_for(SEGMENT_CHAR, paint);
        let first_col = (x / PX_PER_COL as f32).floor() as i64;
        let last_col = ((x + width) / PX_PER_COL as f32).ceil() as i64;
        let first_row = (y / PX_PER_ROW as f32).floor() as i64;
        let last_row = ((y + height) / PX_PER_ROW as f32).ceil() as i64;

        for row in first_row..last_row {
            for col in first_col..last_col {
                self.paint_cell(col, row, glyph);
            }
        }
    }

    fn present(&mut self) -> Result<()> {
        if !self.mounted {
            return Ok(());
        }

        let (cols, rows) = self.board_size();
        for row in 0..rows {
            for col in 0..cols {
                let pos = (col, row + HEADER_ROWS);
                let glyph = self.frame[row as usize * cols as usize + col as usize].unwrap_or(Glyph::BLANK);
                // Only touch cells that changed since the last frame.
                if self.term.glyph_at(pos) != Some(glyph) {
                    self.term.print_at(pos, glyph)?;
                }
            }
        }
        self.term.flush()
    }
}

impl Presentation for Overlay {
    type Surface = Overlay;

    fn mount(&mut self) -> Result<()> {
        self.term.clear()?;
        self.clear();
        self.mounted = true;
        self.draw_header()
    }

    fn unmount(&mut self) -> Result<()> {
        self.mounted = false;
        self.game_over = None;
        self.clear();
        self.term.clear()?;
        self.term.flush()
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn surface(&mut self) -> Option<&mut Overlay> {
        if self.mounted {
            Some(self)
        } else {
            None
        }
    }

    fn show_game_over(&mut self, final_score: u32) -> Result<()> {
        if !self.mounted {
            return Ok(());
        }

        let score_line = format!("Score: {}", final_score);
        let modal = self.term.show_message(&[
            "Game Over",
            &score_line,
            "",
            "[ Play Again ]",
            "R / Enter to restart, Esc to close",
        ])?;
        self.game_over = Some(modal);
        Ok(())
    }

    fn hide_game_over(&mut self) -> Result<()> {
        if self.game_over.take().is_some() {
            self.term.hide_message()?;
        }
        Ok(())
    }

    fn show_score(&mut self, score: u32) {
        self.score = score;
        self.refresh_header();
    }

    fn show_high_score(&mut self, high_score: u32) {
        self.high_score = high_score;
        self.refresh_header();
    }
}

impl Overlay {
    fn refresh_header(&mut self) {
        if !self.mounted {
            return;
        }
        // A missing score bar is cosmetic; the board keeps going.
        if let Err(err) = self.draw_scores() {
            log::warn!("Could not update score bar: {:#}", err);
        }
    }
}

fn glyph_for(ch: char, paint: Paint) -> Glyph {
    let glyph = Glyph::new(ch, paint.color);
    if paint.glow > 0.0 {
        glyph.bold()
    } else {
        glyph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(width: TermInt, height: TermInt) -> Overlay {
        Overlay::new(TermManager::with_size(width, height))
    }

    fn painted(overlay: &Overlay) -> Vec<(usize, usize)> {
        let (cols, _) = overlay.board_size();
        overlay
            .frame
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_some())
            .map(|(i, _)| (i % cols as usize, i / cols as usize))
            .collect()
    }

    #[test]
    fn test_canvas_size_excludes_header() {
        assert_eq!(overlay(40, 11).size(), (400, 200));
        assert_eq!(overlay(40, 0).size(), (400, 0));
    }

    #[test]
    fn test_segment_covers_two_columns() {
        let mut overlay = overlay(40, 11);
        overlay.fill_rect(41.0, 61.0, 18.0, 18.0, Paint::flat(Color::Green));

        assert_eq!(painted(&overlay), vec![(4, 3), (5, 3)]);
        assert!(!overlay.frame[3 * 40 + 4].unwrap().bold);
    }

    #[test]
    fn test_food_fills_its_cell_and_glows() {
        let mut overlay = overlay(40, 11);
        overlay.fill_circle(50.0, 70.0, 8.0, Paint::glowing(Color::Blue, 15.0));

        assert_eq!(painted(&overlay), vec![(4, 3), (5, 3)]);
        let glyph = overlay.frame[3 * 40 + 4].unwrap();
        assert_eq!(glyph.ch, FOOD_CHAR);
        assert!(glyph.bold);
    }

    #[test]
    fn test_tiny_circle_still_shows() {
        let mut overlay = overlay(40, 11);
        overlay.fill_circle(52.0, 70.0, 1.0, Paint::flat(Color::Blue));

        assert_eq!(painted(&overlay), vec![(5, 3)]);
    }

    #[test]
    fn test_drawing_off_board_is_clipped() {
        let mut overlay = overlay(4, 3);
        overlay.fill_rect(-20.0, 30.0, 100.0, 100.0, Paint::flat(Color::Green));

        assert_eq!(painted(&overlay), vec![(0, 1), (1, 1), (2, 1), (3, 1)]);

        overlay.clear();
        assert!(painted(&overlay).is_empty());
    }

    #[test]
    fn test_score_push_repaints_only_the_scores() {
        let mut overlay = overlay(100, 11);
        overlay.mount().unwrap();
        let marker = Glyph::new('#', Color::Red);
        overlay.term.print_at((30, 0), marker).unwrap();

        overlay.show_high_score(120);
        overlay.show_score(60);
        assert_eq!(overlay.term.glyph_at((30, 0)), Some(marker));
        assert_eq!(overlay.term.glyph_at((8, 0)).map(|g| g.ch), Some('6'));

        // A shorter text leaves no stale digits behind.
        overlay.show_score(0);
        overlay.show_high_score(0);
        let row: String = (0..26).filter_map(|x| overlay.term.glyph_at((x, 0))).map(|g| g.ch).collect();
        assert_eq!(row, " Score: 0   High Score: 0 ");
        assert_eq!(overlay.term.glyph_at((30, 0)), Some(marker));
    }

    #[test]
    fn test_scores_too_wide_redraw_the_header() {
        let mut overlay = overlay(40, 11);
        overlay.mount().unwrap();
        let marker = Glyph::new('#', Color::Red);
        overlay.term.print_at((30, 0), marker).unwrap();

        overlay.show_high_score(10_000_000);
        assert_ne!(overlay.term.glyph_at((30, 0)), Some(marker));
        assert_eq!(overlay.term.glyph_at((31, 0)).map(|g| g.ch), Some('['));
    }

    #[test]
    fn test_hits() {
        let mut overlay = overlay(40, 11);
        assert_eq!(overlay.hit((39, 0)), None);

        overlay.mounted = true;
        assert_eq!(overlay.hit((39, 0)), Some(OverlayHit::Close));
        assert_eq!(overlay.hit((31, 0)), Some(OverlayHit::Close));
        assert_eq!(overlay.hit((0, 0)), None);
        assert_eq!(overlay.hit((10, 5)), Some(OverlayHit::Board));

        overlay.game_over = Some(Message::new(10, 4, (15, 3)));
        assert_eq!(overlay.hit((16, 4)), Some(OverlayHit::PlayAgain));
        assert_eq!(overlay.hit((10, 5)), Some(OverlayHit::Board));
    }

    #[test]
    fn test_unmounted_overlay_has_no_surface() {
        let mut overlay = overlay(40, 11);
        assert!(overlay.surface().is_none());

        overlay.mounted = true;
        assert!(overlay.surface().is_some());
    }
}
