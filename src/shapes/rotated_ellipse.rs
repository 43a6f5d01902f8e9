use std::fmt;

use serde::{Deserialize, Serialize};

use super::nudge;
use super::raster::{fill_polygon, rotate_about};
use crate::geometry::{Bounds, Scanline};
use crate::random::RandomSource;

/// Vertices of the polygon approximating the outline
const OUTLINE_POINTS: i32 = 20;

/// Ellipse with radii `rx` and `ry`, turned by `angle` degrees about its centre
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotatedEllipse {
    pub x: i32,
    pub y: i32,
    pub rx: i32,
    pub ry: i32,
    /// Degrees, kept in `[0, 360)`
    pub angle: i32,
    bounds: Bounds,
}

impl RotatedEllipse {
    pub fn new(bounds: Bounds, x: i32, y: i32, rx: i32, ry: i32, angle: i32) -> Self {
        Self {
            x,
            y,
            rx,
            ry,
            angle,
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
        self.angle = rng.random_range(0, 360);
    }

    pub fn mutate(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        match rng.random_range(0, 3) {
            0 => {
                self.x = nudge(self.x, rng.random_range(-16, 16), b.x_min, b.last_x());
                self.y = nudge(self.y, rng.random_range(-16, 16), b.y_min, b.last_y());
            }
            1 => self.rx = nudge(self.rx, rng.random_range(-16, 16), 1, b.last_x()),
            2 => self.ry = nudge(self.ry, rng.random_range(-16, 16), 1, b.last_y()),
            3 => self.angle = (self.angle + rng.random_range(-4, 4)).rem_euclid(360),
            _ => unreachable!("rotated ellipse has four mutations"),
        }
    }

    /// Fills a 20 sided polygon inscribed in the ellipse
    pub fn rasterize(&self) -> Vec<Scanline> {
        if self.is_degenerate() {
            return Vec::new();
        }
        let outline: Vec<(f32, f32)> = (0..OUTLINE_POINTS)
            .map(|i| {
                let theta = (i as f64 * 360.0 / OUTLINE_POINTS as f64).to_radians();
                let (dx, dy) = (self.rx as f64 * theta.cos(), self.ry as f64 * theta.sin());
                rotate_about(self.x, self.y, dx, dy, self.angle)
            })
            .collect();
        fill_polygon(&outline, &self.bounds)
    }

    pub fn is_degenerate(&self) -> bool {
        self.rx <= 0 || self.ry <= 0
    }
}

impl fmt::Display for RotatedEllipse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RotatedEllipse(x={}, y={}, rx={}, ry={}, angle={})",
            self.x, self.y, self.rx, self.ry, self.angle
        )
    }
}
