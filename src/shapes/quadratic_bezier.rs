use std::fmt;

use serde::{Deserialize, Serialize};

use super::{misses_bounds, nudge};
use super::raster::trace_path;
use crate::geometry::{Bounds, Point, Scanline};
use crate::random::RandomSource;

/// Straight segments used to approximate the curve
const SEGMENTS: i32 = 20;

/// One pixel wide quadratic Bézier curve from `(x1, y1)` to `(x2, y2)`,
/// pulled towards the control point `(cx, cy)`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadraticBezier {
    pub cx: i32,
    pub cy: i32,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    bounds: Bounds,
}

impl QuadraticBezier {
    pub fn new(bounds: Bounds, cx: i32, cy: i32, x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            cx,
            cy,
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

    /// Control point first, then both endpoints, anywhere up to and
    /// including the far edge of the canvas
    pub fn setup(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        for (x, y) in [
            (&mut self.cx, &mut self.cy),
            (&mut self.x1, &mut self.y1),
            (&mut self.x2, &mut self.y2),
        ] {
            *x = rng.random_range(b.x_min, b.x_max);
            *y = rng.random_range(b.y_min, b.y_max);
        }
    }

    /// Move the control point or one endpoint by up to 8 pixels
    ///
    /// Endpoints are kept off the first row and column.
    pub fn mutate(&mut self, rng: &mut impl RandomSource) {
        let b = self.bounds;
        let (x, y, min_x, min_y) = match rng.random_range(0, 2) {
            0 => (&mut self.cx, &mut self.cy, b.x_min, b.y_min),
            1 => (&mut self.x1, &mut self.y1, b.x_min + 1, b.y_min + 1),
            2 => (&mut self.x2, &mut self.y2, b.x_min + 1, b.y_min + 1),
            _ => unreachable!("quadratic bezier has three points"),
        };
        *x = nudge(*x, rng.random_range(-8, 8), min_x, b.x_max);
        *y = nudge(*y, rng.random_range(-8, 8), min_y, b.y_max);
    }

    /// Point on the curve at parameter `t` in `[0, 1]`, truncated to a pixel
    fn point_at(&self, t: f64) -> Point<i32> {
        let u = 1.0 - t;
        let along = |p1: i32, c: i32, p2: i32| {
            let (p1, c, p2) = (p1 as f64, c as f64, p2 as f64);
            (u * (u * p1 + t * c) + t * (u * c + t * p2)) as i32
        };
        Point::new(
            along(self.x1, self.cx, self.x2),
            along(self.y1, self.cy, self.y2),
        )
    }

    pub fn rasterize(&self) -> Vec<Scanline> {
        let path: Vec<Point<i32>> = (0..=SEGMENTS)
            .map(|i| self.point_at(i as f64 / SEGMENTS as f64))
            .collect();
        trace_path(&path, &self.bounds)
    }

    /// The curve stays inside the box of its three points
    pub fn is_degenerate(&self) -> bool {
        let points = [(self.x1, self.y1), (self.cx, self.cy), (self.x2, self.y2)];
        misses_bounds(points, &self.bounds)
    }
}

impl fmt::Display for QuadraticBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QuadraticBezier(cx={}, cy={}, x1={}, y1={}, x2={}, y2={})",
            self.cx, self.cy, self.x1, self.y1, self.x2, self.y2
        )
    }
}
