use std::fmt;

use serde::{Deserialize, Serialize};

use super::nudge;
use super::raster::fill_polygon;
use crate::geometry::{Bounds, Scanline};
use crate::random::RandomSource;

/// Filled triangle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    /// Three vertices as `(x, y)` pixel coordinates
    pub points: [(i32, i32); 3],
    bounds: Bounds,
}

impl Triangle {
    pub fn new(bounds: Bounds, points: [(i32, i32); 3]) -> Self {
        Self { points, bounds }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Drop the first vertex anywhere, then the other two within 32 pixels of it
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

    /// Move a single vertex by up to 16 pixels on each axis
    pub fn mutate(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        let index = rng.random_range(0, 2) as usize;
        let (x, y) = self.points[index];
        self.points[index] = (
            nudge(x, rng.random_range(-16, 16), b.x_min, b.last_x()),
            nudge(y, rng.random_range(-16, 16), b.y_min, b.last_y()),
        );
    }

    pub fn rasterize(&self) -> Vec<Scanline> {
        let vertices = self.points.map(|(x, y)| (x as f32, y as f32));
        fill_polygon(&vertices, &self.bounds)
    }

    /// Duplicate or collinear vertices enclose no area
    pub fn is_degenerate(&self) -> bool {
        let [p0, p1, p2] = self.points;

        if p0 == p1 || p1 == p2 || p0 == p2 {
            return true;
        }

        // Twice the signed area; zero means the vertices are collinear
        let area = (p1.0 - p0.0) as i64 * (p2.1 - p0.1) as i64
            - (p2.0 - p0.0) as i64 * (p1.1 - p0.1) as i64;
        area == 0
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [(x1, y1), (x2, y2), (x3, y3)] = self.points;
        write!(
            f,
            "Triangle(x1={x1}, y1={y1}, x2={x2}, y2={y2}, x3={x3}, y3={y3})"
        )
    }
}
