use std::fmt;

use serde::{Deserialize, Serialize};

use super::nudge;
use super::raster::isqrt;
use crate::geometry::{Bounds, Scanline};
use crate::random::RandomSource;

/// Filled circle centred on `(x, y)`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub x: i32,
    pub y: i32,
    /// Radius in pixels
    pub r: i32,
    bounds: Bounds,
}

impl Circle {
    pub fn new(bounds: Bounds, x: i32, y: i32, r: i32) -> Self {
        Self { x, y, r, bounds }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Random centre with a radius between 1 and 32
    ///
    /// The centre may sit on the far edge, one past the last pixel.
    pub fn setup(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        self.x = rng.random_range(b.x_min, b.x_max);
        self.y = rng.random_range(b.y_min, b.y_max);
        self.r = rng.random_range(1, 32);
    }

    /// Either move the centre or change the radius, by up to 16 pixels
    pub fn mutate(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        match rng.random_range(0, 1) {
            0 => {
                self.x = nudge(self.x, rng.random_range(-16, 16), b.x_min, b.x_max);
                self.y = nudge(self.y, rng.random_range(-16, 16), b.y_min, b.y_max);
            }
            1 => self.r = nudge(self.r, rng.random_range(-16, 16), 1, b.x_max),
            _ => unreachable!("circle has two mutations"),
        }
    }

    /// One scanline per row: every pixel with `dx² + dy² <= r²`
    pub fn rasterize(&self) -> Vec<Scanline> {
        let r = self.r as i64;
        (-self.r..=self.r)
            .filter_map(|dy| {
                let half = isqrt(r * r - (dy as i64).pow(2)) as i32;
                self.bounds
                    .trim(Scanline::new(self.y + dy, self.x - half, self.x + half))
            })
            .collect()
    }

    pub fn is_degenerate(&self) -> bool {
        self.r <= 0
    }
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circle(x={}, y={}, r={})", self.x, self.y, self.r)
    }
}
