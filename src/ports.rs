//! Capabilities the game engine is handed at construction.

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::render::Canvas;

/// Durable string-keyed numeric slots.
pub trait ScoreStore {
    /// Missing or unreadable values read as 0.
    fn get(&self, key: &str) -> u32;
    fn set(&mut self, key: &str, value: u32);
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn get(&self, key: &str) -> u32 {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: u32) {
        (**self).set(key, value)
    }
}

/// A cancellable repeating task. Holds at most one schedule at a time.
pub trait Scheduler {
    fn schedule(&mut self, period: Duration);
    fn cancel(&mut self);
    fn is_scheduled(&self) -> bool;
    /// Reports whether a run came due at `now`, consuming it.
    fn poll(&mut self, now: Instant) -> bool;
    fn next_deadline(&self) -> Option<Instant>;
}

/// The overlay the game lives in.
pub trait Presentation {
    type Surface: Canvas;

    fn mount(&mut self) -> Result<()>;
    fn unmount(&mut self) -> Result<()>;
    fn set_scroll_locked(&mut self, locked: bool);
    /// Only available while mounted.
    fn surface(&mut self) -> Option<&mut Self::Surface>;
    fn show_game_over(&mut self, final_score: u32) -> Result<()>;
    fn hide_game_over(&mut self) -> Result<()>;
    fn show_score(&mut self, score: u32);
    fn show_high_score(&mut self, high_score: u32);
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::render::Paint;

    #[derive(Debug, Default)]
    pub struct FakeScheduler {
        pub period: Option<Duration>,
        pub due: bool,
        pub schedules: usize,
        pub cancels: usize,
    }

    impl FakeScheduler {
        /// Makes the next poll report a run.
        pub fn fire(&mut self) {
            self.due = true;
        }
    }

    impl Scheduler for FakeScheduler {
        fn schedule(&mut self, period: Duration) {
            assert!(self.period.is_none(), "a tick is already scheduled");
            self.period = Some(period);
            self.schedules += 1;
        }

        fn cancel(&mut self) {
            self.period = None;
            self.due = false;
            self.cancels += 1;
        }

        fn is_scheduled(&self) -> bool {
            self.period.is_some()
        }

        fn poll(&mut self, _now: Instant) -> bool {
            let fired = self.period.is_some() && self.due;
            self.due = false;
            fired
        }

        fn next_deadline(&self) -> Option<Instant> {
            None
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Clear,
        Circle { cx: f32, cy: f32, radius: f32, paint: Paint },
        Rect { x: f32, y: f32, width: f32, height: f32, paint: Paint },
    }

    #[derive(Debug, Default)]
    pub struct RecordingCanvas {
        pub width: u32,
        pub height: u32,
        pub ops: Vec<DrawOp>,
        pub frames: usize,
    }

    impl Canvas for RecordingCanvas {
        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn clear(&mut self) {
            self.ops.clear();
            self.ops.push(DrawOp::Clear);
        }

        fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: Paint) {
            self.ops.push(DrawOp::Circle { cx, cy, radius, paint });
        }

        fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: Paint) {
            self.ops.push(DrawOp::Rect { x, y, width, height, paint });
        }

        fn present(&mut self) -> Result<()> {
            self.frames += 1;
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    pub struct FakePresentation {
        pub canvas: RecordingCanvas,
        pub mounted: bool,
        pub mounts: usize,
        pub unmounts: usize,
        pub scroll_locked: bool,
        pub game_over: Option<u32>,
        pub scores: Vec<u32>,
        pub high_scores: Vec<u32>,
    }

    impl FakePresentation {
        pub fn with_size(width: u32, height: u32) -> Self {
            Self {
                canvas: RecordingCanvas { width, height, ..Default::default() },
                ..Default::default()
            }
        }
    }

    impl Presentation for FakePresentation {
        type Surface = RecordingCanvas;

        fn mount(&mut self) -> Result<()> {
            self.mounted = true;
            self.mounts += 1;
            Ok(())
        }

        fn unmount(&mut self) -> Result<()> {
            self.mounted = false;
            self.game_over = None;
            self.unmounts += 1;
            Ok(())
        }

        fn set_scroll_locked(&mut self, locked: bool) {
            self.scroll_locked = locked;
        }

        fn surface(&mut self) -> Option<&mut RecordingCanvas> {
            if self.mounted {
                Some(&mut self.canvas)
            } else {
                None
            }
        }

        fn show_game_over(&mut self, final_score: u32) -> Result<()> {
            self.game_over = Some(final_score);
            Ok(())
        }

        fn hide_game_over(&mut self) -> Result<()> {
            self.game_over = None;
            Ok(())
        }

        fn show_score(&mut self, score: u32) {
            self.scores.push(score);
        }

        fn show_high_score(&mut self, high_score: u32) {
            self.high_scores.push(high_score);
        }
    }
}
