use std::fmt;

use serde::{Deserialize, Serialize};

use super::{misses_bounds, nudge};
use crate::geometry::{Bounds, Scanline};
use crate::random::RandomSource;

/// Axis aligned rectangle spanned by two opposite corners
///
/// The corners may be given in any order; rasterization normalizes them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    bounds: Bounds,
}

impl Rectangle {
    pub fn new(bounds: Bounds, x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            bounds,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Place the first corner anywhere and the second up to 32 pixels away
    pub fn setup(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        self.x1 = rng.random_range(b.x_min, b.last_x());
        self.y1 = rng.random_range(b.y_min, b.last_y());
        self.x2 = nudge(self.x1, rng.random_range(1, 32), b.x_min, b.last_x());
        self.y2 = nudge(self.y1, rng.random_range(1, 32), b.y_min, b.last_y());
    }

    /// Move one of the two corners by up to 16 pixels on each axis
    pub fn mutate(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        let (x, y) = match rng.random_range(0, 1) {
            0 => (&mut self.x1, &mut self.y1),
            1 => (&mut self.x2, &mut self.y2),
            _ => unreachable!("rectangle has two corners"),
        };
        *x = nudge(*x, rng.random_range(-16, 16), b.x_min, b.last_x());
        *y = nudge(*y, rng.random_range(-16, 16), b.y_min, b.last_y());
    }

    /// One scanline per row between the corners
    pub fn rasterize(&self) -> Vec<Scanline> {
        let (left, right) = (self.x1.min(self.x2), self.x1.max(self.x2));
        let (top, bottom) = (self.y1.min(self.y2), self.y1.max(self.y2));
        (top..=bottom)
            .filter_map(|y| self.bounds.trim(Scanline::new(y, left, right)))
            .collect()
    }

    /// A rectangle is degenerate only if it misses the canvas entirely
    pub fn is_degenerate(&self) -> bool {
        misses_bounds([(self.x1, self.y1), (self.x2, self.y2)], &self.bounds)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rectangle(x1={}, y1={}, x2={}, y2={})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}
