//! Secret triggers that open the game from the host page.

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

pub const KONAMI_CODE: [KeyCode; 10] = [
    KeyCode::Up,
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::Char('b'),
    KeyCode::Char('a'),
];

pub const TAPS_TO_ACTIVATE: u32 = 5;
pub const TAP_WINDOW: Duration = Duration::from_secs(2);

/// Follows progress through the Konami sequence. Any wrong key starts over.
#[derive(Debug, Default)]
pub struct KonamiTracker {
    index: usize,
}

impl KonamiTracker {
    /// Returns true when `code` completes the sequence.
    pub fn feed(&mut self, code: KeyCode) -> bool {
        if code != KONAMI_CODE[self.index] {
            self.index = 0;
            return false;
        }

        self.index += 1;
        if self.index == KONAMI_CODE.len() {
            self.index = 0;
            return true;
        }
        false
    }

    #[cfg(test)]
    pub fn progress(&self) -> usize {
        self.index
    }
}

/// Counts rapid taps. The first tap opens a window; the count is dropped
/// once the window closes.
#[derive(Debug)]
pub struct TapTrigger {
    required: u32,
    window: Duration,
    count: u32,
    opened_at: Option<Instant>,
}

impl Default for TapTrigger {
    fn default() -> Self {
        Self::new(TAPS_TO_ACTIVATE, TAP_WINDOW)
    }
}

impl TapTrigger {
    pub fn new(required: u32, window: Duration) -> Self {
        TapTrigger { required, window, count: 0, opened_at: None }
    }

    /// Returns true on the tap that reaches the required count in time.
    pub fn tap(&mut self, now: Instant) -> bool {
        if let Some(opened_at) = self.opened_at {
            if now.duration_since(opened_at) >= self.window {
                self.count = 0;
                self.opened_at = None;
            }
        }

        self.count += 1;
        if self.count == 1 {
            self.opened_at = Some(now);
        }

        if self.count >= self.required {
            self.count = 0;
            self.opened_at = None;
            return true;
        }
        false
    }
}
