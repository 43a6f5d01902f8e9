use std::fmt;

use serde::{Deserialize, Serialize};

use super::{misses_bounds, nudge};
use super::raster::{fill_polygon, rotate_about};
use crate::geometry::{Bounds, Scanline};
use crate::random::RandomSource;

/// Rectangle of size `sx` by `sy` centred on `(x, y)`, turned by `angle` degrees
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotatedRectangle {
    pub x: i32,
    pub y: i32,
    pub sx: i32,
    pub sy: i32,
    /// Degrees, kept in `[0, 360)`
    pub angle: i32,
    bounds: Bounds,
}

impl RotatedRectangle {
    pub fn new(bounds: Bounds, x: i32, y: i32, sx: i32, sy: i32, angle: i32) -> Self {
        Self {
            x,
            y,
            sx,
            sy,
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
        self.sx = rng.random_range(1, 32);
        self.sy = rng.random_range(1, 32);
        self.angle = rng.random_range(0, 360);
    }

    /// Move the centre, resize, or turn by up to 4 degrees
    pub fn mutate(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        match rng.random_range(0, 2) {
            0 => {
                self.x = nudge(self.x, rng.random_range(-16, 16), b.x_min, b.last_x());
                self.y = nudge(self.y, rng.random_range(-16, 16), b.y_min, b.last_y());
            }
            1 => {
                self.sx = nudge(self.sx, rng.random_range(-16, 16), 1, b.last_x());
                self.sy = nudge(self.sy, rng.random_range(-16, 16), 1, b.last_y());
            }
            2 => self.angle = (self.angle + rng.random_range(-4, 4)).rem_euclid(360),
            _ => unreachable!("rotated rectangle has three mutations"),
        }
    }

    /// The four rotated corners, clockwise from top left
    fn corners(&self) -> [(f32, f32); 4] {
        let (hx, hy) = (self.sx as f64 / 2.0, self.sy as f64 / 2.0);
        [(-hx, -hy), (hx, -hy), (hx, hy), (-hx, hy)]
            .map(|(dx, dy)| rotate_about(self.x, self.y, dx, dy, self.angle))
    }

    pub fn rasterize(&self) -> Vec<Scanline> {
        fill_polygon(&self.corners(), &self.bounds)
    }

    pub fn is_degenerate(&self) -> bool {
        let corners = self.corners().map(|(x, y)| (x as i32, y as i32));
        self.sx <= 0 || self.sy <= 0 || misses_bounds(corners, &self.bounds)
    }
}

impl fmt::Display for RotatedRectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RotatedRectangle(x={}, y={}, sx={}, sy={}, angle={})",
            self.x, self.y, self.sx, self.sy, self.angle
        )
    }
}
