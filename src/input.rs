use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction::{self, *};

/// Virtual pixels covered by one terminal column and one terminal row.
pub const PX_PER_COL: u32 = 10;
pub const PX_PER_ROW: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    Restart,
    Close,
    Quit,
    None,
}

/// Maps a key press to what it means while the game overlay is up.
pub fn game_key_action(key: &KeyEvent) -> KeyAction {
    if is_ctrl_c(key) {
        return KeyAction::Quit;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Steer(Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Steer(Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Steer(Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Steer(Right),
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => KeyAction::Restart,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Close,
        _ => KeyAction::None,
    }
}

pub fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Direction of a gesture from its displacement. The vertical axis only wins
/// when it is strictly larger, so ties go horizontal.
pub fn swipe_direction(dx: f32, dy: f32) -> Option<Direction> {
    if dy.abs() > dx.abs() {
        Some(if dy > 0.0 { Down } else { Up })
    } else if dx > 0.0 {
        Some(Right)
    } else if dx < 0.0 {
        Some(Left)
    } else {
        None
    }
}

/// Converts a terminal position to canvas pixels, `top` rows being reserved
/// above the canvas.
pub fn cell_to_pixels(column: u16, row: u16, top: u16) -> (f32, f32) {
    (
        (column as u32 * PX_PER_COL) as f32,
        (row.saturating_sub(top) as u32 * PX_PER_ROW) as f32,
    )
}

/// Remembers where a drag began until it is released.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    start: Option<(f32, f32)>,
}

impl SwipeTracker {
    pub fn press(&mut self, at: (f32, f32)) {
        self.start = Some(at);
    }

    /// Returns the gesture's endpoints if a press was pending.
    pub fn release(&mut self, at: (f32, f32)) -> Option<((f32, f32), (f32, f32))> {
        self.start.take().map(|start| (start, at))
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}
