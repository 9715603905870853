use std::time::Instant;

use anyhow::Result;
use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::config::GameConfig;
use crate::food::spawn_food;
use crate::input::swipe_direction;
use crate::ports::{Presentation, ScoreStore, Scheduler};
use crate::render::{Canvas, Renderer};
use crate::snake::{Bounds, Cell, Direction, MoveResult::*, Snake};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Inactive,
    Running,
    GameOver,
}

/// The hidden snake game: board state, tick driver and overlay lifecycle.
pub struct SnakeGame<S, T, P> {
    config: GameConfig,
    store: S,
    scheduler: T,
    presentation: P,
    renderer: Renderer,
    rng: StdRng,
    state: GameState,
    bounds: Bounds,
    snake: Snake,
    food: Cell,
    current_direction: Direction,
    pending_direction: Direction,
    score: u32,
    high_score: u32,
}

impl<S: ScoreStore, T: Scheduler, P: Presentation> SnakeGame<S, T, P> {
    pub fn new(config: GameConfig, store: S, scheduler: T, presentation: P) -> Self {
        let high_score = store.get(&config.high_score_key);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        SnakeGame {
            renderer: Renderer::new(config.grid_unit),
            snake: Snake::new(config.initial_snake.iter().copied()),
            current_direction: config.initial_direction,
            pending_direction: config.initial_direction,
            config,
            store,
            scheduler,
            presentation,
            rng,
            state: GameState::Inactive,
            bounds: Bounds::new(0, 0),
            food: Cell::new(0, 0),
            score: 0,
            high_score,
        }
    }

    /// Mounts the overlay and begins a session. Does nothing while a game is
    /// already on screen.
    pub fn start(&mut self) -> Result<()> {
        if self.state != GameState::Inactive {
            debug!("start ignored, game is {:?}", self.state);
            return Ok(());
        }

        self.presentation.mount()?;
        self.presentation.set_scroll_locked(true);
        if let Some(surface) = self.presentation.surface() {
            let (width, height) = surface.size();
            self.bounds = Bounds::from_surface(width, height, self.config.grid_unit);
        }
        self.presentation.show_high_score(self.high_score);

        self.state = GameState::Running;
        info!("Snake started on a {}x{} board", self.bounds.cols, self.bounds.rows);
        self.reset()
    }

    /// Tears the overlay down. Safe to call in any state.
    pub fn stop(&mut self) -> Result<()> {
        self.scheduler.cancel();
        if self.state == GameState::Inactive {
            return Ok(());
        }

        self.state = GameState::Inactive;
        self.presentation.set_scroll_locked(false);
        self.presentation.unmount()?;
        info!("Snake closed with score {}", self.score);
        Ok(())
    }

    /// Starts a fresh session on the mounted overlay.
    pub fn reset(&mut self) -> Result<()> {
        if self.state == GameState::Inactive {
            debug!("reset ignored, game is not mounted");
            return Ok(());
        }

        self.scheduler.cancel();
        debug_assert!(!self.scheduler.is_scheduled());

        self.score = 0;
        self.presentation.show_score(self.score);
        self.current_direction = self.config.initial_direction;
        self.pending_direction = self.config.initial_direction;
        self.snake = Snake::new(self.config.initial_snake.iter().copied());
        self.spawn_food();

        self.presentation.hide_game_over()?;
        self.state = GameState::Running;
        self.scheduler.schedule(self.config.tick_interval());
        self.draw()
    }

    /// Runs a tick if the schedule says one is due.
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        if self.scheduler.poll(now) {
            self.update()?;
        }
        Ok(())
    }

    /// One simulation step.
    pub fn update(&mut self) -> Result<()> {
        if self.state != GameState::Running {
            return Ok(());
        }

        self.current_direction = self.pending_direction;

        match self.snake.advance(self.current_direction, self.bounds, self.food) {
            Crashed { at } => {
                debug!("Head ran into the body at ({}, {})", at.x, at.y);
                return self.game_over();
            }
            Ate { .. } => {
                self.add_score(self.config.food_reward);
                self.spawn_food();
            }
            Moved { .. } => {}
        }

        self.draw()
    }

    /// Buffers a direction for the next tick. U-turns and input outside a
    /// running game are dropped.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.state != GameState::Running || direction.is_opposite(self.current_direction) {
            return false;
        }

        self.pending_direction = direction;
        true
    }

    /// Steers along the dominant axis of a press-to-release gesture.
    pub fn swipe(&mut self, from: (f32, f32), to: (f32, f32)) -> bool {
        match swipe_direction(to.0 - from.0, to.1 - from.1) {
            Some(direction) => self.steer(direction),
            None => false,
        }
    }

    /// Recomputes the board size after the surface changed.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.bounds = Bounds::from_surface(width, height, self.config.grid_unit);
        debug!("Board resized to {}x{}", self.bounds.cols, self.bounds.rows);
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[cfg(test)]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[cfg(test)]
    pub fn food(&self) -> Cell {
        self.food
    }

    #[cfg(test)]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    ///////////////////////////////////////////////////////////////////////////

    fn add_score(&mut self, points: u32) {
        self.score += points;
        self.presentation.show_score(self.score);

        if self.score > self.high_score {
            self.high_score = self.score;
            self.store.set(&self.config.high_score_key, self.high_score);
            self.presentation.show_high_score(self.high_score);
        }
    }

    fn spawn_food(&mut self) {
        match spawn_food(self.bounds, &self.snake, &mut self.rng) {
            Some(cell) => self.food = cell,
            None => warn!(
                "No free cell for food on a {}x{} board",
                self.bounds.cols, self.bounds.rows
            ),
        }
    }

    fn game_over(&mut self) -> Result<()> {
        self.state = GameState::GameOver;
        self.scheduler.cancel();
        info!(
            "Game over with score {} at length {} (best {})",
            self.score,
            self.snake.len(),
            self.high_score
        );
        self.presentation.show_game_over(self.score)
    }

    fn draw(&mut self) -> Result<()> {
        match self.presentation.surface() {
            Some(surface) => self.renderer.draw(surface, &self.snake, self.food),
            None => Ok(()),
        }
    }
}
