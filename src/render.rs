use anyhow::Result;
use crossterm::style::Color;

use crate::snake::{Cell, Snake};

pub const FOOD_COLOR: Color = Color::Rgb { r: 0x63, g: 0x66, b: 0xf1 };
pub const SNAKE_COLOR: Color = Color::Rgb { r: 0xc4, g: 0xf8, b: 0x2a };

const FOOD_GLOW: f32 = 15.0;
const HEAD_GLOW: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    /// Blur radius of the halo around the shape, 0 for none.
    pub glow: f32,
}

impl Paint {
    pub fn flat(color: Color) -> Self {
        Paint { color, glow: 0.0 }
    }

    pub fn glowing(color: Color, glow: f32) -> Self {
        Paint { color, glow }
    }
}

/// A 2D drawing surface addressed in pixels.
pub trait Canvas {
    fn size(&self) -> (u32, u32);
    fn clear(&mut self);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: Paint);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: Paint);
    /// Makes the frame drawn since the last clear visible.
    fn present(&mut self) -> Result<()>;
}

pub struct Renderer {
    grid_unit: f32,
}

impl Renderer {
    pub fn new(grid_unit: u32) -> Self {
        Self { grid_unit: grid_unit as f32 }
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, snake: &Snake, food: Cell) -> Result<()> {
        let unit = self.grid_unit;
        canvas.clear();

        canvas.fill_circle(
            food.x as f32 * unit + unit / 2.0,
            food.y as f32 * unit + unit / 2.0,
            unit / 2.0 - 2.0,
            Paint::glowing(FOOD_COLOR, FOOD_GLOW),
        );

        for (i, segment) in snake.body().iter().enumerate() {
            let paint = if i == 0 {
                Paint::glowing(SNAKE_COLOR, HEAD_GLOW)
            } else {
                Paint::flat(SNAKE_COLOR)
            };

            canvas.fill_rect(
                segment.x as f32 * unit + 1.0,
                segment.y as f32 * unit + 1.0,
                unit - 2.0,
                unit - 2.0,
                paint,
            );
        }

        canvas.present()
    }
}
