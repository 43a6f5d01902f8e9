use std::fmt;

use serde::{Deserialize, Serialize};

use super::{misses_bounds, nudge};
use super::raster::trace_path;
use crate::geometry::{Bounds, Point, Scanline};
use crate::random::RandomSource;

/// One pixel wide straight line between two endpoints
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    bounds: Bounds,
}

impl Line {
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

    pub fn setup(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        self.x1 = rng.random_range(b.x_min, b.last_x());
        self.y1 = rng.random_range(b.y_min, b.last_y());
        self.x2 = nudge(self.x1, rng.random_range(-32, 32), b.x_min, b.last_x());
        self.y2 = nudge(self.y1, rng.random_range(-32, 32), b.y_min, b.last_y());
    }

    pub fn mutate(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        let (x, y) = match rng.random_range(0, 1) {
            0 => (&mut self.x1, &mut self.y1),
            1 => (&mut self.x2, &mut self.y2),
            _ => unreachable!("line has two endpoints"),
        };
        *x = nudge(*x, rng.random_range(-16, 16), b.x_min, b.last_x());
        *y = nudge(*y, rng.random_range(-16, 16), b.y_min, b.last_y());
    }

    pub fn rasterize(&self) -> Vec<Scanline> {
        let ends = [Point::new(self.x1, self.y1), Point::new(self.x2, self.y2)];
        trace_path(&ends, &self.bounds)
    }

    /// A line always covers at least one pixel unless it misses the canvas
    pub fn is_degenerate(&self) -> bool {
        misses_bounds([(self.x1, self.y1), (self.x2, self.y2)], &self.bounds)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line(x1={}, y1={}, x2={}, y2={})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}
