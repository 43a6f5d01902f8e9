use std::fmt;

use serde::{Deserialize, Serialize};

use super::nudge;
use crate::geometry::{Bounds, Scanline};
use crate::random::RandomSource;

/// Axis aligned filled ellipse with radii `rx` and `ry`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ellipse {
    pub x: i32,
    pub y: i32,
    pub rx: i32,
    pub ry: i32,
    bounds: Bounds,
}

impl Ellipse {
    pub fn new(bounds: Bounds, x: i32, y: i32, rx: i32, ry: i32) -> Self {
        Self {
            x,
            y,
            rx,
            ry,
            bounds,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn setup(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        self.x = rng.random_range(b.x_min, b.last_x());
        self.y = rng.random_range(b.y_min, b.last_y());
        self.rx = rng.random_range(1, 32);
        self.ry = rng.random_range(1, 32);
    }

    /// Move the centre or change one of the radii
    ///
    /// Radii are clamped against the canvas extent, not against a size
    /// limit of their own, so an ellipse can grow to cover the whole canvas.
    pub fn mutate(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        match rng.random_range(0, 2) {
            0 => {
                self.x = nudge(self.x, rng.random_range(-16, 16), b.x_min, b.last_x());
                self.y = nudge(self.y, rng.random_range(-16, 16), b.y_min, b.last_y());
            }
            1 => self.rx = nudge(self.rx, rng.random_range(-16, 16), 1, b.last_x()),
            2 => self.ry = nudge(self.ry, rng.random_range(-16, 16), 1, b.last_y()),
            _ => unreachable!("ellipse has three mutations"),
        }
    }

    pub fn rasterize(&self) -> Vec<Scanline> {
        if self.rx <= 0 || self.ry <= 0 {
            return Vec::new();
        }
        let (rx, ry) = (self.rx as f64, self.ry as f64);
        (-self.ry..=self.ry)
            .filter_map(|dy| {
                let t = dy as f64 / ry;
                let half = (rx * (1.0 - t * t).max(0.0).sqrt()).floor() as i32;
                self.bounds
                    .trim(Scanline::new(self.y + dy, self.x - half, self.x + half))
            })
            .collect()
    }

    pub fn is_degenerate(&self) -> bool {
        self.rx <= 0 || self.ry <= 0
    }
}

impl fmt::Display for Ellipse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ellipse(x={}, y={}, rx={}, ry={})",
            self.x, self.y, self.rx, self.ry
        )
    }
}
