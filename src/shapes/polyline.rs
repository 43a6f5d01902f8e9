use std::fmt;

use serde::{Deserialize, Serialize};

use super::{misses_bounds, nudge};
use super::raster::trace_path;
use crate::geometry::{Bounds, Point, Scanline};
use crate::random::RandomSource;

/// Open path through four points, drawn one pixel wide
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: [(i32, i32); 4],
    bounds: Bounds,
}

impl Polyline {
    pub fn new(bounds: Bounds, points: [(i32, i32); 4]) -> Self {
        Self { points, bounds }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Start anywhere; the remaining points land within 32 pixels of the first
    pub fn setup(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        let x = rng.random_range(b.x_min, b.last_x());
        let y = rng.random_range(b.y_min, b.last_y());
        self.points[0] = (x, y);
        for point in &mut self.points[1..] {
            *point = (
                nudge(x, rng.random_range(-32, 32), b.x_min, b.last_x()),
                nudge(y, rng.random_range(-32, 32), b.y_min, b.last_y()),
            );
        }
    }

    pub fn mutate(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        let index = rng.random_range(0, 3) as usize;
        let (x, y) = self.points[index];
        self.points[index] = (
            nudge(x, rng.random_range(-16, 16), b.x_min, b.last_x()),
            nudge(y, rng.random_range(-16, 16), b.y_min, b.last_y()),
        );
    }

    pub fn rasterize(&self) -> Vec<Scanline> {
        let path = self.points.map(|(x, y)| Point::new(x, y));
        trace_path(&path, &self.bounds)
    }

    pub fn is_degenerate(&self) -> bool {
        misses_bounds(self.points, &self.bounds)
    }
}

impl fmt::Display for Polyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Polyline(")?;
        for (i, (x, y)) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({x}, {y})")?;
        }
        f.write_str(")")
    }
}
