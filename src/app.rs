use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use log::{debug, info, warn};

use crate::activation::{KonamiTracker, TapTrigger};
use crate::config::GameConfig;
use crate::game::{GameState, SnakeGame};
use crate::input::{cell_to_pixels, game_key_action, is_ctrl_c, KeyAction, SwipeTracker};
use crate::overlay::{Overlay, OverlayHit, HEADER_ROWS};
use crate::page::Page;
use crate::ports::{Scheduler, ScoreStore};
use crate::render::Canvas;
use crate::term::TermManager;
use crate::timer::IntervalTimer;

/// How long to wait for input when no tick is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

type Game = SnakeGame<Box<dyn ScoreStore>, IntervalTimer, Overlay>;

/// The host page with the game hidden in it. Watches for the secret
/// triggers and routes input to whichever of the two is on screen.
pub struct App {
    game: Game,
    page: Page,
    konami: KonamiTracker,
    taps: TapTrigger,
    swipe: SwipeTracker,
    should_quit: bool,
}

impl App {
    pub fn new(config: GameConfig, store: Box<dyn ScoreStore>) -> Result<Self> {
        let overlay = Overlay::new(TermManager::new()?);
        Ok(Self::with_overlay(config, store, overlay))
    }

    pub fn with_overlay(config: GameConfig, store: Box<dyn ScoreStore>, overlay: Overlay) -> Self {
        App {
            game: SnakeGame::new(config, store, IntervalTimer::new(), overlay),
            page: Page::new(),
            konami: KonamiTracker::default(),
            taps: TapTrigger::default(),
            swipe: SwipeTracker::default(),
            should_quit: false,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.game.presentation_mut().term_mut().setup()?;

        let result = self.event_loop();

        // Leave the terminal usable even when the loop failed.
        self.shut_game();
        self.game.presentation_mut().term_mut().restore()?;

        result
    }

    fn event_loop(&mut self) -> Result<()> {
        self.draw_page()?;

        while !self.should_quit {
            let timeout = self
                .game
                .scheduler()
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .unwrap_or(IDLE_POLL);

            if event::poll(timeout).context("Failed to poll terminal events")? {
                let event = event::read().context("Failed to read terminal event")?;
                self.handle_event(event, Instant::now())?;
            }

            self.game.tick(Instant::now())?;
        }

        info!("Leaving page, best score {}", self.game.high_score());
        Ok(())
    }

    fn handle_event(&mut self, event: Event, now: Instant) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
            Event::Resize(width, height) => self.handle_resize(width, height),
            _ => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.game.state() == GameState::Inactive {
            return self.handle_page_key(key);
        }

        match game_key_action(&key) {
            KeyAction::Steer(direction) => {
                self.game.steer(direction);
                Ok(())
            }
            KeyAction::Restart if self.game.state() == GameState::GameOver => self.game.reset(),
            KeyAction::Close => self.close_game(),
            KeyAction::Quit => {
                self.should_quit = true;
                Ok(())
            }
            KeyAction::Restart | KeyAction::None => Ok(()),
        }
    }

    fn handle_page_key(&mut self, key: KeyEvent) -> Result<()> {
        if is_ctrl_c(&key) || matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
            self.should_quit = true;
            return Ok(());
        }

        if self.konami.feed(key.code) {
            info!("Konami code entered");
            return self.open_game();
        }

        match key.code {
            KeyCode::Up => self.scroll_page(-1),
            KeyCode::Down => self.scroll_page(1),
            KeyCode::PageUp => self.scroll_page(-10),
            KeyCode::PageDown => self.scroll_page(10),
            _ => Ok(()),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) -> Result<()> {
        let pos = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_page(-1),
            MouseEventKind::ScrollDown => self.scroll_page(1),
            MouseEventKind::Down(MouseButton::Left) => {
                if self.game.state() == GameState::Inactive {
                    let size = self.game.presentation().term_size();
                    if self.page.profile_hit(pos, size) && self.taps.tap(now) {
                        info!("Profile picture tapped open");
                        return self.open_game();
                    }
                    return Ok(());
                }

                match self.game.presentation().hit(pos) {
                    Some(OverlayHit::Close) => self.close_game(),
                    Some(OverlayHit::PlayAgain) => {
                        self.swipe.cancel();
                        self.game.reset()
                    }
                    Some(OverlayHit::Board) => {
                        self.swipe.press(cell_to_pixels(pos.0, pos.1, HEADER_ROWS));
                        Ok(())
                    }
                    None => Ok(()),
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some((from, to)) = self.swipe.release(cell_to_pixels(pos.0, pos.1, HEADER_ROWS)) {
                    self.game.swipe(from, to);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_resize(&mut self, width: u16, height: u16) -> Result<()> {
        debug!("Terminal resized to {}x{}", width, height);
        self.game.presentation_mut().resize_terminal(width, height)?;

        if self.game.state() == GameState::Inactive {
            self.page.scroll_by(0, height);
            return self.draw_page();
        }

        let (surface_width, surface_height) = self.game.presentation().size();
        self.game.resize(surface_width, surface_height);
        Ok(())
    }

    fn open_game(&mut self) -> Result<()> {
        self.swipe.cancel();
        self.game.start()
    }

    fn close_game(&mut self) -> Result<()> {
        self.swipe.cancel();
        debug!("Closing game at score {}", self.game.score());
        self.game.stop()?;
        self.draw_page()
    }

    fn shut_game(&mut self) {
        if let Err(err) = self.game.stop() {
            warn!("Could not close the game cleanly: {:#}", err);
        }
    }

    fn scroll_page(&mut self, delta: isize) -> Result<()> {
        if self.game.presentation().scroll_locked() {
            return Ok(());
        }

        let (_, height) = self.game.presentation().term_size();
        if self.page.scroll_by(delta, height) {
            self.draw_page()?;
        }
        Ok(())
    }

    fn draw_page(&mut self) -> Result<()> {
        self.page.draw(self.game.presentation_mut().term_mut())
    }
}
